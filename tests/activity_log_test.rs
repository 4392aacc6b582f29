use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use talenthub::{
    domain::{
        ActivityLogEntry, ActivityQuery, AnnouncementType, Audience, CreateRecipientRequest,
        Recipient, RecipientRole,
    },
    repository::{ActivityLogRepository, RecipientRepository},
    service::{announcement_service::CreateDraft, ServiceContext},
};

async fn setup() -> anyhow::Result<(Arc<ServiceContext>, Recipient)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let context = Arc::new(ServiceContext::new(pool));

    let admin = context
        .recipient_repo
        .create(CreateRecipientRequest {
            full_name: "Dana Admin".to_string(),
            email: "dana@agency.test".to_string(),
            role: RecipientRole::Admin,
        })
        .await?;

    Ok((context, admin))
}

fn entry(actor_id: Option<Uuid>, action: &str, entity_type: &str, age: Duration) -> ActivityLogEntry {
    ActivityLogEntry {
        id: Uuid::new_v4(),
        actor_id,
        actor_name: "Dana Admin".to_string(),
        action: action.to_string(),
        entity_type: entity_type.to_string(),
        entity_id: Some(Uuid::new_v4()),
        detail: Some(format!("{} detail", action)),
        created_at: Utc::now() - age,
    }
}

#[tokio::test]
async fn test_lifecycle_operations_are_audited() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(
            &admin,
            CreateDraft {
                title: "Audited".to_string(),
                content: "Content".to_string(),
                announcement_type: AnnouncementType::General,
                audience: Audience::All,
            },
        )
        .await?;
    context
        .announcement_service
        .publish_now(draft.id, Some(&admin))
        .await?;
    context.announcement_service.archive(draft.id, &admin).await?;

    let page = context
        .activity_service
        .list(&ActivityQuery {
            page: 1,
            page_size: 20,
            group: Some("announcement".to_string()),
            ..Default::default()
        })
        .await?;

    let actions: Vec<&str> = page.data.iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&"announcement.created"));
    assert!(actions.contains(&"announcement.published"));
    assert!(actions.contains(&"announcement.archived"));
    assert!(page.data.iter().all(|e| e.actor_id == Some(admin.id)));

    Ok(())
}

#[tokio::test]
async fn test_scheduler_publishes_are_attributed_to_system() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(
            &admin,
            CreateDraft {
                title: "Timed".to_string(),
                content: "Content".to_string(),
                announcement_type: AnnouncementType::General,
                audience: Audience::All,
            },
        )
        .await?;
    context
        .announcement_service
        .schedule(draft.id, &admin, Utc::now() + Duration::milliseconds(50))
        .await?;

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    context.announcement_service.publish_due(Utc::now()).await?;

    let page = context
        .activity_service
        .list(&ActivityQuery {
            page: 1,
            page_size: 20,
            search: Some("published".to_string()),
            ..Default::default()
        })
        .await?;

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].actor_id, None);
    assert_eq!(page.data[0].actor_name, "system");

    Ok(())
}

#[tokio::test]
async fn test_pagination_envelope() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    for i in 0..25 {
        context
            .activity_repo
            .record(entry(
                Some(admin.id),
                &format!("ticket.updated.{}", i),
                "ticket",
                Duration::minutes(i),
            ))
            .await?;
    }

    let page = context
        .activity_service
        .list(&ActivityQuery {
            page: 2,
            page_size: 10,
            ..Default::default()
        })
        .await?;

    assert_eq!(page.total, 25);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.data.len(), 10);

    // Newest first: page 2 starts at the 11th most recent entry.
    assert_eq!(page.data[0].action, "ticket.updated.10");

    let last_page = context
        .activity_service
        .list(&ActivityQuery {
            page: 3,
            page_size: 10,
            ..Default::default()
        })
        .await?;
    assert_eq!(last_page.data.len(), 5);

    Ok(())
}

#[tokio::test]
async fn test_filters_combine() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;
    let other = Uuid::new_v4();

    context
        .activity_repo
        .record(entry(Some(admin.id), "placement.created", "placement", Duration::zero()))
        .await?;
    context
        .activity_repo
        .record(entry(Some(admin.id), "invoice.sent", "invoice", Duration::zero()))
        .await?;
    context
        .activity_repo
        .record(entry(Some(other), "placement.closed", "placement", Duration::zero()))
        .await?;

    let by_group = context
        .activity_service
        .list(&ActivityQuery {
            page: 1,
            page_size: 10,
            group: Some("placement".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_group.total, 2);

    let by_group_and_actor = context
        .activity_service
        .list(&ActivityQuery {
            page: 1,
            page_size: 10,
            group: Some("placement".to_string()),
            actor: Some(admin.id),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_group_and_actor.total, 1);
    assert_eq!(by_group_and_actor.data[0].action, "placement.created");

    let by_search = context
        .activity_service
        .list(&ActivityQuery {
            page: 1,
            page_size: 10,
            search: Some("invoice".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_search.total, 1);
    assert_eq!(by_search.data[0].action, "invoice.sent");

    Ok(())
}

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;

use talenthub::{
    domain::{
        AnnouncementStatus, AnnouncementType, Audience, CreateRecipientRequest, Recipient,
        RecipientRole,
    },
    error::AppError,
    repository::{NotificationRepository, RecipientRepository},
    service::{
        announcement_service::{CreateDraft, EditAnnouncement},
        ServiceContext,
    },
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

fn draft_request(title: &str) -> CreateDraft {
    CreateDraft {
        title: title.to_string(),
        content: "Some announcement content".to_string(),
        announcement_type: AnnouncementType::General,
        audience: Audience::All,
    }
}

#[tokio::test]
async fn test_create_draft_round_trip() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let created = context
        .announcement_service
        .create_draft(
            &admin,
            CreateDraft {
                title: "T".to_string(),
                content: "C".to_string(),
                announcement_type: AnnouncementType::General,
                audience: Audience::All,
            },
        )
        .await?;

    let fetched = context.announcement_service.get(created.id).await?;
    assert_eq!(fetched.title, "T");
    assert_eq!(fetched.content, "C");
    assert_eq!(fetched.status, AnnouncementStatus::Draft);
    assert_eq!(fetched.created_by, admin.id);
    assert!(fetched.published_at.is_none());

    Ok(())
}

#[tokio::test]
async fn test_create_draft_rejects_empty_fields() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let err = context
        .announcement_service
        .create_draft(
            &admin,
            CreateDraft {
                title: "   ".to_string(),
                content: "body".to_string(),
                announcement_type: AnnouncementType::General,
                audience: Audience::All,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = context
        .announcement_service
        .create_draft(
            &admin,
            CreateDraft {
                title: "title".to_string(),
                content: "".to_string(),
                announcement_type: AnnouncementType::General,
                audience: Audience::All,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn test_schedule_requires_future_timestamp() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(&admin, draft_request("Maintenance"))
        .await?;

    let err = context
        .announcement_service
        .schedule(draft.id, &admin, Utc::now() - Duration::hours(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let scheduled_at = Utc::now() + Duration::hours(2);
    let scheduled = context
        .announcement_service
        .schedule(draft.id, &admin, scheduled_at)
        .await?;
    assert_eq!(scheduled.status, AnnouncementStatus::Scheduled);
    assert!(scheduled.scheduled_at.is_some());

    Ok(())
}

#[tokio::test]
async fn test_schedule_only_from_draft() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(&admin, draft_request("News"))
        .await?;

    context
        .announcement_service
        .publish_now(draft.id, Some(&admin))
        .await?;

    let err = context
        .announcement_service
        .schedule(draft.id, &admin, Utc::now() + Duration::hours(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    Ok(())
}

#[tokio::test]
async fn test_publish_from_draft_and_from_scheduled() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let from_draft = context
        .announcement_service
        .create_draft(&admin, draft_request("From draft"))
        .await?;
    let published = context
        .announcement_service
        .publish_now(from_draft.id, Some(&admin))
        .await?;
    assert_eq!(published.status, AnnouncementStatus::Published);
    assert!(published.published_at.is_some());

    let from_scheduled = context
        .announcement_service
        .create_draft(&admin, draft_request("From scheduled"))
        .await?;
    context
        .announcement_service
        .schedule(from_scheduled.id, &admin, Utc::now() + Duration::days(1))
        .await?;
    let published = context
        .announcement_service
        .publish_now(from_scheduled.id, Some(&admin))
        .await?;
    assert_eq!(published.status, AnnouncementStatus::Published);

    Ok(())
}

#[tokio::test]
async fn test_publish_twice_is_rejected() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(&admin, draft_request("Once only"))
        .await?;

    context
        .announcement_service
        .publish_now(draft.id, Some(&admin))
        .await?;

    let err = context
        .announcement_service
        .publish_now(draft.id, Some(&admin))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_publish_has_exactly_one_winner() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    // Two clients so a double dispatch would be visible in the
    // notification count.
    let client = context
        .recipient_repo
        .create(CreateRecipientRequest {
            full_name: "Client One".to_string(),
            email: "client1@agency.test".to_string(),
            role: RecipientRole::Client,
        })
        .await?;
    context
        .recipient_repo
        .create(CreateRecipientRequest {
            full_name: "Client Two".to_string(),
            email: "client2@agency.test".to_string(),
            role: RecipientRole::Client,
        })
        .await?;

    let draft = context
        .announcement_service
        .create_draft(&admin, draft_request("Race"))
        .await?;

    let (first, second) = tokio::join!(
        context.announcement_service.publish_now(draft.id, Some(&admin)),
        context.announcement_service.publish_now(draft.id, Some(&admin)),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one publish must win");

    let loser = if first.is_err() { first } else { second };
    assert!(matches!(loser.unwrap_err(), AppError::InvalidTransition(_)));

    // Dispatch ran exactly once: one notification per client.
    let notifications = context.notification_repo.list_for_recipient(client.id, 50, 0).await?;
    assert_eq!(notifications.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_archive_is_idempotent() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(&admin, draft_request("Old news"))
        .await?;

    context
        .announcement_service
        .publish_now(draft.id, Some(&admin))
        .await?;

    let archived = context.announcement_service.archive(draft.id, &admin).await?;
    assert_eq!(archived.status, AnnouncementStatus::Archived);
    assert!(archived.archived_at.is_some());

    // Second archive is a no-op success.
    let again = context.announcement_service.archive(draft.id, &admin).await?;
    assert_eq!(again.status, AnnouncementStatus::Archived);
    assert_eq!(again.archived_at, archived.archived_at);

    Ok(())
}

#[tokio::test]
async fn test_archive_reachable_from_every_status() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let from_draft = context
        .announcement_service
        .create_draft(&admin, draft_request("Draft"))
        .await?;
    let archived = context
        .announcement_service
        .archive(from_draft.id, &admin)
        .await?;
    assert_eq!(archived.status, AnnouncementStatus::Archived);

    let from_scheduled = context
        .announcement_service
        .create_draft(&admin, draft_request("Scheduled"))
        .await?;
    context
        .announcement_service
        .schedule(from_scheduled.id, &admin, Utc::now() + Duration::days(1))
        .await?;
    let archived = context
        .announcement_service
        .archive(from_scheduled.id, &admin)
        .await?;
    assert_eq!(archived.status, AnnouncementStatus::Archived);

    Ok(())
}

#[tokio::test]
async fn test_publish_after_archive_is_rejected() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(&admin, draft_request("Gone"))
        .await?;
    context.announcement_service.archive(draft.id, &admin).await?;

    let err = context
        .announcement_service
        .publish_now(draft.id, Some(&admin))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    Ok(())
}

#[tokio::test]
async fn test_edit_allowed_only_while_editable() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(&admin, draft_request("Editable"))
        .await?;

    let edited = context
        .announcement_service
        .edit(
            draft.id,
            &admin,
            EditAnnouncement {
                title: Some("Edited title".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(edited.title, "Edited title");

    context
        .announcement_service
        .schedule(draft.id, &admin, Utc::now() + Duration::days(1))
        .await?;
    let edited = context
        .announcement_service
        .edit(
            draft.id,
            &admin,
            EditAnnouncement {
                content: Some("Updated body".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(edited.content, "Updated body");

    context
        .announcement_service
        .publish_now(draft.id, Some(&admin))
        .await?;
    let err = context
        .announcement_service
        .edit(
            draft.id,
            &admin,
            EditAnnouncement {
                title: Some("Too late".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ReadOnly(_)));

    context.announcement_service.archive(draft.id, &admin).await?;
    let err = context
        .announcement_service
        .edit(
            draft.id,
            &admin,
            EditAnnouncement {
                title: Some("Still too late".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ReadOnly(_)));

    Ok(())
}

#[tokio::test]
async fn test_edit_cannot_blank_required_fields() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let draft = context
        .announcement_service
        .create_draft(&admin, draft_request("Keep me valid"))
        .await?;

    let err = context
        .announcement_service
        .edit(
            draft.id,
            &admin,
            EditAnnouncement {
                content: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn test_publish_due_promotes_elapsed_schedules() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let talent = context
        .recipient_repo
        .create(CreateRecipientRequest {
            full_name: "Tess Talent".to_string(),
            email: "tess@agency.test".to_string(),
            role: RecipientRole::Talent,
        })
        .await?;

    let due = context
        .announcement_service
        .create_draft(&admin, draft_request("Due soon"))
        .await?;
    context
        .announcement_service
        .schedule(due.id, &admin, Utc::now() + Duration::milliseconds(50))
        .await?;

    let not_due = context
        .announcement_service
        .create_draft(&admin, draft_request("Next week"))
        .await?;
    context
        .announcement_service
        .schedule(not_due.id, &admin, Utc::now() + Duration::days(7))
        .await?;

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let published = context.announcement_service.publish_due(Utc::now()).await?;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].id, due.id);
    assert_eq!(published[0].status, AnnouncementStatus::Published);

    // The future schedule is untouched.
    let untouched = context.announcement_service.get(not_due.id).await?;
    assert_eq!(untouched.status, AnnouncementStatus::Scheduled);

    // Fan-out happened for the published one.
    let notifications = context.notification_repo.list_for_recipient(talent.id, 50, 0).await?;
    assert_eq!(notifications.len(), 1);

    // A second pass finds nothing left to do.
    let published = context.announcement_service.publish_due(Utc::now()).await?;
    assert!(published.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_delete_missing_announcement() -> anyhow::Result<()> {
    let (context, admin) = setup().await?;

    let err = context
        .announcement_service
        .delete(uuid::Uuid::new_v4(), &admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

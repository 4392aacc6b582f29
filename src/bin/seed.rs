use clap::Parser;
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Fake,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

use talenthub::{
    domain::{AnnouncementType, Audience, CreateRecipientRequest, RecipientRole},
    repository::RecipientRepository,
    service::{announcement_service::CreateDraft, ServiceContext},
};

#[derive(Parser)]
#[command(about = "Seed the TalentHub database with demo data")]
struct Args {
    #[arg(long, default_value = "sqlite:talenthub.db")]
    database_url: String,

    #[arg(long, default_value_t = 12)]
    clients: usize,

    #[arg(long, default_value_t = 8)]
    talents: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let context = Arc::new(ServiceContext::new(db_pool));

    println!("👥 Creating recipients...");

    let admin = context
        .recipient_repo
        .create(CreateRecipientRequest {
            full_name: "Admin User".to_string(),
            email: "admin@talenthub.local".to_string(),
            role: RecipientRole::Admin,
        })
        .await?;
    println!("  ✅ Created admin user ({})", admin.email);

    for _ in 0..args.clients {
        context
            .recipient_repo
            .create(CreateRecipientRequest {
                full_name: Name().fake(),
                email: SafeEmail().fake(),
                role: RecipientRole::Client,
            })
            .await?;
    }
    println!("  ✅ Created {} clients", args.clients);

    for _ in 0..args.talents {
        context
            .recipient_repo
            .create(CreateRecipientRequest {
                full_name: Name().fake(),
                email: SafeEmail().fake(),
                role: RecipientRole::Talent,
            })
            .await?;
    }
    println!("  ✅ Created {} talents", args.talents);

    println!("📣 Creating announcements...");

    let draft = context
        .announcement_service
        .create_draft(
            &admin,
            CreateDraft {
                title: "Quarterly talent showcase".to_string(),
                content: "We are planning the next talent showcase. Details to follow."
                    .to_string(),
                announcement_type: AnnouncementType::Event,
                audience: Audience::Talents,
            },
        )
        .await?;
    println!("  ✅ Draft: {}", draft.title);

    let maintenance = context
        .announcement_service
        .create_draft(
            &admin,
            CreateDraft {
                title: "Scheduled maintenance window".to_string(),
                content: "The portal will be unavailable on Saturday between 02:00 and 04:00 UTC while we upgrade the database cluster."
                    .to_string(),
                announcement_type: AnnouncementType::Maintenance,
                audience: Audience::All,
            },
        )
        .await?;

    let published = context
        .announcement_service
        .publish_now(maintenance.id, Some(&admin))
        .await?;
    println!("  ✅ Published: {} (notifications fanned out)", published.title);

    println!("🎉 Seeding complete!");

    Ok(())
}

pub mod activity_service;
pub mod announcement_service;
pub mod dispatch_service;
pub mod notification_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::repository::*;

pub use activity_service::ActivityService;
pub use announcement_service::AnnouncementService;
pub use dispatch_service::DispatchService;
pub use notification_service::{FeedSubscription, NotificationService};

pub struct ServiceContext {
    pub recipient_repo: Arc<dyn RecipientRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub activity_repo: Arc<dyn ActivityLogRepository>,
    pub activity_service: Arc<ActivityService>,
    pub dispatch_service: Arc<DispatchService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub notification_service: Arc<NotificationService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool) -> Self {
        let recipient_repo: Arc<dyn RecipientRepository> =
            Arc::new(SqliteRecipientRepository::new(db_pool.clone()));
        let announcement_repo: Arc<dyn AnnouncementRepository> =
            Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
        let notification_repo: Arc<dyn NotificationRepository> =
            Arc::new(SqliteNotificationRepository::new(db_pool.clone()));
        let activity_repo: Arc<dyn ActivityLogRepository> =
            Arc::new(SqliteActivityLogRepository::new(db_pool.clone()));

        let activity_service = Arc::new(ActivityService::new(activity_repo.clone()));
        let dispatch_service = Arc::new(DispatchService::new(
            recipient_repo.clone(),
            notification_repo.clone(),
        ));
        let announcement_service = Arc::new(AnnouncementService::new(
            announcement_repo.clone(),
            dispatch_service.clone(),
            activity_service.clone(),
        ));
        let notification_service = Arc::new(NotificationService::new(notification_repo.clone()));

        Self {
            recipient_repo,
            announcement_repo,
            notification_repo,
            activity_repo,
            activity_service,
            dispatch_service,
            announcement_service,
            notification_service,
            db_pool,
        }
    }
}

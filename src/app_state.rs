use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::APP_CONFIG;
use crate::core::inbox::{InboxSettings, NotificationInbox};
use crate::core::jwt_auth::jwt_auth::JwtSecret;
use crate::core::store::DocumentStore;
use crate::core::store::mongo::MongoStore;
use crate::database;

#[derive(Clone)]
pub struct AppState {
    pub inbox: Arc<NotificationInbox>,
    pub jwt_secret: JwtSecret,
}

impl AppState {
    pub async fn init() -> eyre::Result<Self> {
        let database = database::connection().await?.clone();
        let store: Arc<dyn DocumentStore> = Arc::new(MongoStore::new(database));
        let settings = InboxSettings {
            step_timeout: Some(APP_CONFIG.workflow_step_timeout()),
            ..Default::default()
        };

        Ok(Self::new(
            store,
            settings,
            JwtSecret::new(APP_CONFIG.jwt_secret_key.clone()),
        ))
    }

    pub fn new(
        store: Arc<dyn DocumentStore>,
        settings: InboxSettings,
        jwt_secret: JwtSecret,
    ) -> Self {
        Self {
            inbox: Arc::new(NotificationInbox::new(store, settings)),
            jwt_secret,
        }
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(app_state: &AppState) -> JwtSecret {
        app_state.jwt_secret.clone()
    }
}

impl FromRef<AppState> for Arc<NotificationInbox> {
    fn from_ref(app_state: &AppState) -> Arc<NotificationInbox> {
        app_state.inbox.clone()
    }
}

use mongodb::Database;
use tokio::sync::OnceCell;

use crate::config::APP_CONFIG;
use crate::errors::Error;

static CONNECTION: OnceCell<Database> = OnceCell::const_new();

pub async fn connection() -> Result<&'static Database, Error> {
    CONNECTION
        .get_or_try_init(|| async {
            let db_uri = &APP_CONFIG.database_uri;
            let db_name = &APP_CONFIG.database_name;

            let client = mongodb::Client::with_uri_str(db_uri).await?;
            tracing::info!("connected to MongoDB database {db_name}");
            Ok::<_, Error>(client.database(db_name))
        })
        .await
}

use log::info;
use mongodb::{
    Client, Database,
    bson::doc,
    options::ClientOptions,
};

/// Connect to MongoDB and make sure the server answers before we start serving.
pub async fn get_database(uri: &str, db_name: &str) -> mongodb::error::Result<Database> {
    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.app_name = Some("notesdesk".to_string());

    let client = Client::with_options(client_options)?;
    let db = client.database(db_name);

    db.run_command(doc! { "ping": 1 }).await?;
    info!("Connected to MongoDB database '{}'", db_name);

    Ok(db)
}

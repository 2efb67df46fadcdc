use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the connection fails, or a
/// migration fails.
pub(crate) async fn run_db(
    config: &teun_core::AppConfig,
    command: &DbCommands,
) -> anyhow::Result<()> {
    let pool = teun_db::connect_pool_from_config(config).await?;
    match command {
        DbCommands::Ping => {
            teun_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = teun_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}

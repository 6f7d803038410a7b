use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(nexza_console_migration::Migrator).await;
}

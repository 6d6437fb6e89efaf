use dotenv::dotenv;
use linehaul::api::serve;
use linehaul::db::PgPool;
use linehaul::engine::Engine;
use std::env;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let db_uri = env::var("DATABASE_URL").unwrap();

    let PgPool(pool) = PgPool::new(&db_uri, 5).await.unwrap();

    let engine = Engine::new(pool).await.unwrap();

    serve(engine).await;
}

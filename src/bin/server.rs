use std::path::Path;

use actix_web::middleware::{self, Logger};
use actix_web::{App, HttpServer};
use clap::Parser;
use env_logger::Env;
use fredash::dashboard;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Port number
    #[arg(short, long, default_value = "8111")]
    port: u16,

    /// Environment name, e.g., test, prod
    #[arg(short, long, default_value = "prod")]
    env: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    dotenvy::from_path(Path::new(format!(".env/{}.env", args.env).as_str())).unwrap();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::Compress::default())
            .service(dashboard::index)
            .service(dashboard::api_series)
    })
    .bind(("127.0.0.1", args.port))?
    .run()
    .await
}

#[tokio::main]
async fn main() {
    if let Err(e) = formdesk_api::run_server().await {
        eprintln!("formdesk-api failed: {:#}", e);
        std::process::exit(1);
    }
}

//! ECA Gate pre-receive hook entry point

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = eca_gate::run().await;
    std::process::exit(code);
}

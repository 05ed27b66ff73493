use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    textgen_lambda_text::run().await
}

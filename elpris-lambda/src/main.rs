use elpris::output::SinkOutput;
use elpris::run_comparison;
use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde_json::json;
use uuid::Uuid;

async fn function_handler(event: Request) -> Result<Response<Body>, Error> {
    // Extract some useful information from the request
    let input = match event.body() {
        Body::Empty => Some("".as_bytes()),
        Body::Text(text) => Some(text.as_bytes()),
        Body::Binary(_) => None,
    };

    let results = match input {
        Some(input) => run_comparison(input, SinkOutput, None).map_err(|e| e.to_string()),
        None => Err("The request body must be text, but a binary body was posted".to_string()),
    };

    let resp = match results {
        Ok(results) => Response::builder()
            .status(200)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&results)?))
            .map_err(Box::new)?,
        Err(detail) => Response::builder()
            .status(422)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json!({"errors": [{"id": Uuid::new_v4(), "status": "422", "detail": detail}]}))?))
            .map_err(Box::new)?,
    };

    Ok(resp)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    run(service_fn(function_handler)).await
}

use axum::Router;
use std::net::TcpListener;
use std::time::Duration;
use street_finder::infra::HttpClient;

/// Serve `app` on an ephemeral local port and return its base URL.
pub fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        hyper::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

pub fn http(timeout: Duration) -> HttpClient {
    HttpClient::new(timeout).unwrap()
}

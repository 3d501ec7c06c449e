// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::EffectError;
use crate::preset::Rgb;

const TOGGLE_SERVICE: &str = "light/toggle";
const TURN_ON_SERVICE: &str = "light/turn_on";

/// Drives lights through the Home Assistant REST API.
pub struct Client {
    http: reqwest::Client,
    url: String,
    token: String,
    timeout: Duration,
}

impl Client {
    /// Creates a new client. Every request is bounded by the given timeout.
    pub fn new(url: &str, token: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
        Ok(Client {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout,
        })
    }

    /// Calls a Home Assistant service. Any 2xx response counts as success.
    async fn call_service(&self, service: &str, data: Value) -> Result<(), EffectError> {
        debug!(service, data = data.to_string(), "Calling service.");

        let response = self
            .http
            .post(format!("{}/api/services/{}", self.url, service))
            .bearer_auth(&self.token)
            .json(&data)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(EffectError::Status {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }

    /// Turns on a light with the given extra attributes.
    async fn turn_on(
        &self,
        entity_id: &str,
        attribute: &str,
        value: Value,
    ) -> Result<(), EffectError> {
        let mut data = json!({ "entity_id": entity_id });
        data[attribute] = value;
        self.call_service(TURN_ON_SERVICE, data).await
    }

    fn request_error(&self, e: reqwest::Error) -> EffectError {
        if e.is_timeout() {
            EffectError::Timeout(self.timeout)
        } else {
            EffectError::Request(e)
        }
    }
}

#[async_trait]
impl super::Lights for Client {
    async fn toggle(&self, entity_id: &str) -> Result<(), EffectError> {
        self.call_service(TOGGLE_SERVICE, json!({ "entity_id": entity_id }))
            .await
    }

    async fn set_color_temperature(
        &self,
        entity_id: &str,
        kelvin: u32,
    ) -> Result<(), EffectError> {
        self.turn_on(entity_id, "color_temp_kelvin", json!(kelvin))
            .await
    }

    async fn set_color(&self, entity_id: &str, rgb: Rgb) -> Result<(), EffectError> {
        self.turn_on(entity_id, "rgb_color", json!(rgb)).await
    }

    async fn set_brightness(&self, entity_id: &str, percent: u8) -> Result<(), EffectError> {
        self.turn_on(entity_id, "brightness_pct", json!(percent))
            .await
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Home Assistant ({})", self.url)
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, sync::Arc, time::Duration};

    use axum::{
        extract::{Path, State},
        http::{header::AUTHORIZATION, HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    use super::Client;
    use crate::lights::{EffectError, Lights};

    #[derive(Debug, Clone, PartialEq)]
    struct Request {
        service: String,
        authorization: Option<String>,
        body: Value,
    }

    #[derive(Clone)]
    struct Server {
        requests: Arc<Mutex<Vec<Request>>>,
        status: StatusCode,
        delay: Duration,
    }

    async fn record(
        State(server): State<Server>,
        Path((domain, service)): Path<(String, String)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        server.requests.lock().push(Request {
            service: format!("{}/{}", domain, service),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string()),
            body,
        });
        tokio::time::sleep(server.delay).await;
        server.status
    }

    /// Starts a fake Home Assistant server and returns its URL.
    async fn serve(server: Server) -> Result<String, Box<dyn Error>> {
        let app = Router::new()
            .route("/api/services/:domain/:service", post(record))
            .with_state(server);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/", listener.local_addr()?);
        tokio::spawn(async move { axum::serve(listener, app).await });
        Ok(url)
    }

    fn server(status: StatusCode, delay: Duration) -> Server {
        Server {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            delay,
        }
    }

    #[tokio::test]
    async fn test_light_primitives() -> Result<(), Box<dyn Error>> {
        let server = server(StatusCode::OK, Duration::ZERO);
        let requests = server.requests.clone();
        let client = Client::new(&serve(server).await?, "secret", Duration::from_secs(5))?;

        client.toggle("light.lights").await?;
        client.set_color_temperature("light.lights", 2200).await?;
        client.set_color("light.desk", [255, 100, 0]).await?;
        client.set_brightness("light.desk", 40).await?;

        let requests = requests.lock().clone();
        assert_eq!(
            vec![
                Request {
                    service: "light/toggle".into(),
                    authorization: Some("Bearer secret".into()),
                    body: json!({ "entity_id": "light.lights" }),
                },
                Request {
                    service: "light/turn_on".into(),
                    authorization: Some("Bearer secret".into()),
                    body: json!({ "entity_id": "light.lights", "color_temp_kelvin": 2200 }),
                },
                Request {
                    service: "light/turn_on".into(),
                    authorization: Some("Bearer secret".into()),
                    body: json!({ "entity_id": "light.desk", "rgb_color": [255, 100, 0] }),
                },
                Request {
                    service: "light/turn_on".into(),
                    authorization: Some("Bearer secret".into()),
                    body: json!({ "entity_id": "light.desk", "brightness_pct": 40 }),
                },
            ],
            requests
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status() -> Result<(), Box<dyn Error>> {
        let client = Client::new(
            &serve(server(StatusCode::UNAUTHORIZED, Duration::ZERO)).await?,
            "wrong",
            Duration::from_secs(5),
        )?;

        match client.toggle("light.lights").await {
            Err(EffectError::Status { status, .. }) => assert_eq!(401, status),
            other => panic!("expected status error, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_timeout() -> Result<(), Box<dyn Error>> {
        let timeout = Duration::from_millis(100);
        let client = Client::new(
            &serve(server(StatusCode::OK, Duration::from_secs(2))).await?,
            "secret",
            timeout,
        )?;

        match client.set_brightness("light.lights", 20).await {
            Err(EffectError::Timeout(reported)) => assert_eq!(timeout, reported),
            other => panic!("expected timeout, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable() -> Result<(), Box<dyn Error>> {
        // Bind and immediately drop a listener so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);
        drop(listener);

        let client = Client::new(&url, "secret", Duration::from_secs(1))?;
        assert!(matches!(
            client.toggle("light.lights").await,
            Err(EffectError::Request(_)) | Err(EffectError::Timeout(_))
        ));
        Ok(())
    }
}

use std::io::Read;

use serde::{Deserialize, Serialize};
use url::Url;

pub const CHECKOUT_BASE_URL_DEFAULT: &str = "http://localhost:8787/checkout";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub quantity: u32,
}

#[derive(Serialize)]
struct CheckoutRequest<'a> {
    line_items: &'a [LineItem],
}

#[derive(Deserialize)]
struct CheckoutResponse {
    url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("add at least one item before checking out")]
    EmptyCart,
    #[error("line item \"{0}\" has quantity zero")]
    ZeroQuantity(String),
    #[error("invalid checkout endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("could not encode checkout payload: {0}")]
    Payload(String),
    #[error("checkout request failed: {0}")]
    Transport(String),
    #[error("malformed checkout response: {0}")]
    Response(String),
}

pub fn validate_line_items(items: &[LineItem]) -> Result<(), CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    for item in items {
        if item.quantity == 0 {
            return Err(CheckoutError::ZeroQuantity(item.title.clone()));
        }
    }
    Ok(())
}

// Seam for tests and alternative hosts; the session builder never sees HTTP.
pub trait CheckoutTransport {
    fn post_json(&self, url: &Url, body: &str) -> Result<String, String>;
}

pub struct HttpTransport;

impl CheckoutTransport for HttpTransport {
    fn post_json(&self, url: &Url, body: &str) -> Result<String, String> {
        let response = ureq::post(url.as_str())
            .header("content-type", "application/json")
            .send(body)
            .map_err(|err| err.to_string())?;
        let mut raw = String::new();
        response
            .into_body()
            .into_reader()
            .read_to_string(&mut raw)
            .map_err(|err| err.to_string())?;
        Ok(raw)
    }
}

// One pass-through call: items in, redirect URL out. No retry, no idempotency
// key; failures surface as a single message for the caller to show.
pub fn create_checkout_session(
    transport: &dyn CheckoutTransport,
    base_url: &str,
    items: &[LineItem],
) -> Result<String, CheckoutError> {
    validate_line_items(items)?;
    let url = Url::parse(base_url)?;
    let body = serde_json::to_string(&CheckoutRequest { line_items: items })
        .map_err(|err| CheckoutError::Payload(err.to_string()))?;
    log::debug!("checkout: sending {} line items", items.len());
    let raw = transport
        .post_json(&url, &body)
        .map_err(CheckoutError::Transport)?;
    let parsed: CheckoutResponse =
        serde_json::from_str(&raw).map_err(|err| CheckoutError::Response(err.to_string()))?;
    if parsed.url.trim().is_empty() {
        return Err(CheckoutError::Response("missing redirect url".to_string()));
    }
    Ok(parsed.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubTransport {
        reply: Result<String, String>,
        seen: RefCell<Vec<(String, String)>>,
    }

    impl StubTransport {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CheckoutTransport for StubTransport {
        fn post_json(&self, url: &Url, body: &str) -> Result<String, String> {
            self.seen
                .borrow_mut()
                .push((url.to_string(), body.to_string()));
            self.reply.clone()
        }
    }

    fn cart() -> Vec<LineItem> {
        vec![
            LineItem {
                title: "The Color Primer".to_string(),
                quantity: 1,
            },
            LineItem {
                title: "Gem Puzzle Annual".to_string(),
                quantity: 2,
            },
        ]
    }

    #[test]
    fn session_returns_the_redirect_url() {
        let transport = StubTransport::replying(r#"{"url":"https://pay.example/session/123"}"#);
        let url = create_checkout_session(&transport, CHECKOUT_BASE_URL_DEFAULT, &cart())
            .expect("session");
        assert_eq!(url, "https://pay.example/session/123");

        let seen = transport.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "http://localhost:8787/checkout");
        let payload: serde_json::Value = serde_json::from_str(&seen[0].1).expect("json");
        assert_eq!(payload["line_items"][0]["title"], "The Color Primer");
        assert_eq!(payload["line_items"][1]["quantity"], 2);
    }

    #[test]
    fn empty_cart_never_reaches_the_network() {
        let transport = StubTransport::replying(r#"{"url":"https://pay.example"}"#);
        let result = create_checkout_session(&transport, CHECKOUT_BASE_URL_DEFAULT, &[]);
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert!(transport.seen.borrow().is_empty());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut items = cart();
        items[1].quantity = 0;
        let transport = StubTransport::replying(r#"{"url":"https://pay.example"}"#);
        let result = create_checkout_session(&transport, CHECKOUT_BASE_URL_DEFAULT, &items);
        assert!(matches!(result, Err(CheckoutError::ZeroQuantity(_))));
    }

    #[test]
    fn transport_failure_surfaces_one_message() {
        let transport = StubTransport::failing("connection refused");
        let result = create_checkout_session(&transport, CHECKOUT_BASE_URL_DEFAULT, &cart());
        match result {
            Err(CheckoutError::Transport(message)) => {
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_or_empty_responses_are_rejected() {
        let transport = StubTransport::replying("not json");
        assert!(matches!(
            create_checkout_session(&transport, CHECKOUT_BASE_URL_DEFAULT, &cart()),
            Err(CheckoutError::Response(_))
        ));

        let transport = StubTransport::replying(r#"{"url":"  "}"#);
        assert!(matches!(
            create_checkout_session(&transport, CHECKOUT_BASE_URL_DEFAULT, &cart()),
            Err(CheckoutError::Response(_))
        ));

        let transport = StubTransport::replying("{}");
        assert!(matches!(
            create_checkout_session(&transport, CHECKOUT_BASE_URL_DEFAULT, &cart()),
            Err(CheckoutError::Response(_))
        ));
    }

    #[test]
    fn bad_endpoint_is_rejected_before_sending() {
        let transport = StubTransport::replying(r#"{"url":"https://pay.example"}"#);
        let result = create_checkout_session(&transport, "not a url", &cart());
        assert!(matches!(result, Err(CheckoutError::Endpoint(_))));
        assert!(transport.seen.borrow().is_empty());
    }
}

//! Yeelight LAN control: newline-delimited JSON over TCP.

use std::time::Duration;

use log::debug;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{BulbConnector, BulbLink, BulbProperties};
use crate::errors::Error;
use crate::types::{Dimmer, PowerState, Rgb};

type Result<T> = std::result::Result<T, Error>;

/// Opens [`YeelightLink`]s.
#[derive(Debug, Clone)]
pub struct YeelightConnector {
    port: u16,
    timeout: Duration,
}

impl YeelightConnector {
    pub const PORT: u16 = 55443;

    /// `timeout` bounds the connect and every later request on the link.
    pub fn new(timeout: Duration) -> Self {
        YeelightConnector {
            port: Self::PORT,
            timeout,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl BulbConnector for YeelightConnector {
    type Link = YeelightLink;

    async fn connect(&self, address: &str) -> Result<YeelightLink> {
        let target = format!("{address}:{}", self.port);
        debug!("connecting to bulb at {target}");
        let stream = match timeout(self.timeout, TcpStream::connect(&target)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(Error::transport(address, e)),
            Err(_) => return Err(Error::timeout(address)),
        };
        Ok(YeelightLink {
            address: address.to_string(),
            stream: BufReader::new(stream),
            timeout: self.timeout,
            next_id: 1,
        })
    }
}

/// An open control connection to one bulb.
#[derive(Debug)]
pub struct YeelightLink {
    address: String,
    stream: BufReader<TcpStream>,
    timeout: Duration,
    next_id: u64,
}

#[derive(Deserialize)]
struct Reply {
    id: Option<u64>,
    result: Option<Vec<Value>>,
    error: Option<ReplyError>,
}

#[derive(Deserialize)]
struct ReplyError {
    code: i64,
    message: String,
}

impl YeelightLink {
    const EFFECT: &'static str = "smooth";
    const EFFECT_DURATION_MS: u64 = 500;

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn call(&mut self, method: &str, params: Value) -> Result<Vec<Value>> {
        let id = self.next_id;
        self.next_id += 1;

        let request = json!({"id": id, "method": method, "params": params});
        debug!("{} <- {request}", self.address);
        let reply = timeout(self.timeout, self.exchange(id, request.to_string())).await;
        reply.unwrap_or_else(|_| Err(Error::timeout(&self.address)))
    }

    async fn exchange(&mut self, id: u64, mut frame: String) -> Result<Vec<Value>> {
        frame.push_str("\r\n");
        self.stream
            .get_mut()
            .write_all(frame.as_bytes())
            .await
            .map_err(|e| Error::transport(&self.address, e))?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .stream
                .read_line(&mut line)
                .await
                .map_err(|e| Error::transport(&self.address, e))?;
            if read == 0 {
                return Err(Error::transport(&self.address, "connection closed by bulb"));
            }
            debug!("{} -> {}", self.address, line.trim_end());
            if let Some(result) = parse_reply(&self.address, id, &line)? {
                return Ok(result);
            }
        }
    }

    async fn call_ok(&mut self, method: &str, params: Value) -> Result<()> {
        let result = self.call(method, params).await?;
        match result.first().and_then(Value::as_str) {
            Some("ok") => Ok(()),
            _ => Err(Error::malformed(
                &self.address,
                format!("{method} was not acknowledged"),
            )),
        }
    }
}

/// The result carried by `line` when it answers request `id`.
///
/// Lines for other ids, such as property notifications, yield `None`.
fn parse_reply(address: &str, id: u64, line: &str) -> Result<Option<Vec<Value>>> {
    let reply: Reply = serde_json::from_str(line).map_err(|e| Error::malformed(address, e))?;
    if reply.id != Some(id) {
        return Ok(None);
    }
    if let Some(error) = reply.error {
        return Err(Error::bad_response_code(address, error.code, error.message));
    }
    reply
        .result
        .map(Some)
        .ok_or_else(|| Error::malformed(address, "reply carries neither result nor error"))
}

/// Numeric properties arrive as strings.
fn number(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn parse_properties(address: &str, result: &[Value]) -> Result<BulbProperties> {
    let [power, bright, rgb] = result else {
        return Err(Error::malformed(
            address,
            format!("expected 3 properties, got {}", result.len()),
        ));
    };
    let power = match power.as_str() {
        Some("on") => PowerState::On,
        Some("off") => PowerState::Off,
        _ => return Err(Error::malformed(address, format!("bad power value {power}"))),
    };
    let brightness = number(bright)
        .and_then(|b| u8::try_from(b).ok())
        .and_then(Dimmer::create)
        .ok_or_else(|| Error::malformed(address, format!("bad brightness {bright}")))?;
    let rgb = number(rgb)
        .and_then(|packed| u32::try_from(packed).ok())
        .map(Rgb::from_packed)
        .ok_or_else(|| Error::malformed(address, format!("bad rgb {rgb}")))?;
    Ok(BulbProperties {
        power,
        brightness,
        rgb,
    })
}

impl BulbLink for YeelightLink {
    async fn get_properties(&mut self) -> Result<BulbProperties> {
        let result = self
            .call("get_prop", json!(["power", "bright", "rgb"]))
            .await?;
        parse_properties(&self.address, &result)
    }

    /// The bulb does not accept 0; it is sent as 1.
    async fn set_brightness(&mut self, brightness: Dimmer) -> Result<()> {
        let level = brightness.value().max(1);
        self.call_ok(
            "set_bright",
            json!([level, Self::EFFECT, Self::EFFECT_DURATION_MS]),
        )
        .await
    }

    async fn set_rgb(&mut self, rgb: Rgb) -> Result<()> {
        self.call_ok(
            "set_rgb",
            json!([rgb.packed(), Self::EFFECT, Self::EFFECT_DURATION_MS]),
        )
        .await
    }

    async fn toggle(&mut self) -> Result<()> {
        self.call_ok("toggle", json!([])).await
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    const ADDRESS: &str = "127.0.0.1";

    /// Serve one connection, answering each request line with the next reply.
    /// Returns the port and a handle yielding the received requests.
    async fn serve(replies: Vec<&'static str>) -> (u16, tokio::task::JoinHandle<Vec<Value>>) {
        let listener = TcpListener::bind((ADDRESS, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut socket = BufReader::new(socket);
            let mut requests = Vec::new();
            for reply in replies {
                let mut line = String::new();
                socket.read_line(&mut line).await.unwrap();
                assert!(line.ends_with("\r\n"));
                requests.push(serde_json::from_str(&line).unwrap());
                socket.get_mut().write_all(reply.as_bytes()).await.unwrap();
            }
            requests
        });
        (port, handle)
    }

    fn connector(port: u16) -> YeelightConnector {
        YeelightConnector::new(Duration::from_secs(2)).with_port(port)
    }

    #[tokio::test]
    async fn test_get_properties_skips_notifications() {
        let (port, server) = serve(vec![
            "{\"method\":\"props\",\"params\":{\"bright\":\"10\"}}\r\n{\"id\":1,\"result\":[\"on\",\"75\",\"16744448\"]}\r\n",
        ])
        .await;
        let mut link = connector(port).connect(ADDRESS).await.unwrap();

        let properties = link.get_properties().await.unwrap();
        assert_eq!(properties.power, PowerState::On);
        assert_eq!(properties.brightness.value(), 75);
        assert_eq!(properties.rgb, Rgb::rgb(255, 128, 0));

        let requests = server.await.unwrap();
        assert_eq!(
            requests[0],
            json!({"id": 1, "method": "get_prop", "params": ["power", "bright", "rgb"]})
        );
    }

    #[tokio::test]
    async fn test_commands_wire_format() {
        let (port, server) = serve(vec![
            "{\"id\":1,\"result\":[\"ok\"]}\r\n",
            "{\"id\":2,\"result\":[\"ok\"]}\r\n",
            "{\"id\":3,\"result\":[\"ok\"]}\r\n",
        ])
        .await;
        let mut link = connector(port).connect(ADDRESS).await.unwrap();

        link.set_brightness(Dimmer::create(0).unwrap()).await.unwrap();
        link.set_rgb(Rgb::rgb(0, 0, 255)).await.unwrap();
        link.toggle().await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(requests[0]["method"], "set_bright");
        assert_eq!(requests[0]["params"], json!([1, "smooth", 500]));
        assert_eq!(requests[1]["params"], json!([255, "smooth", 500]));
        assert_eq!(requests[2], json!({"id": 3, "method": "toggle", "params": []}));
    }

    #[tokio::test]
    async fn test_error_reply_maps_to_response_code() {
        let (port, _server) = serve(vec![
            "{\"id\":1,\"error\":{\"code\":-1,\"message\":\"unsupported method\"}}\r\n",
        ])
        .await;
        let mut link = connector(port).connect(ADDRESS).await.unwrap();

        let err = link.toggle().await.unwrap_err();
        assert_eq!(err, Error::bad_response_code(ADDRESS, -1, "unsupported method"));
    }

    #[tokio::test]
    async fn test_closed_connection_is_transport_failure() {
        let (port, _server) = serve(vec![]).await;
        let mut link = connector(port).connect(ADDRESS).await.unwrap();

        let err = link.toggle().await.unwrap_err();
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_parse_reply() {
        assert_eq!(parse_reply(ADDRESS, 2, r#"{"id":1,"result":["ok"]}"#).unwrap(), None);
        assert_eq!(
            parse_reply(ADDRESS, 1, r#"{"id":1,"result":["ok"]}"#).unwrap(),
            Some(vec![json!("ok")])
        );
        assert!(matches!(
            parse_reply(ADDRESS, 1, r#"{"id":1}"#),
            Err(Error::MalformedResponse { .. })
        ));
        assert!(parse_reply(ADDRESS, 1, "garbage").is_err());
    }

    #[test]
    fn test_parse_properties() {
        let props = parse_properties(ADDRESS, &[json!("off"), json!(5), json!("255")]).unwrap();
        assert_eq!(props.power, PowerState::Off);
        assert_eq!(props.brightness.value(), 5);
        assert_eq!(props.rgb, Rgb::rgb(0, 0, 255));

        assert!(parse_properties(ADDRESS, &[json!("on"), json!("101"), json!("0")]).is_err());
        assert!(parse_properties(ADDRESS, &[json!("on")]).is_err());
    }
}

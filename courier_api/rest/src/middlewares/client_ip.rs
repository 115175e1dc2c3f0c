use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::{from_fn, Next},
    Router,
};
use tracing::{debug, error, warn};

use crate::RealIpConfig;

pub fn add<S: Clone + Send + Sync + 'static>(
    real_ip_config: Option<Arc<RealIpConfig>>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |mut request: Request, next: Next| {
            let client_ip = ClientIp::from_request(&request, real_ip_config.as_deref());
            request.extensions_mut().insert(client_ip);
            next.run(request)
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    fn from_request(request: &Request, real_ip_config: Option<&RealIpConfig>) -> Self {
        let Some(client_ip) = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
        else {
            // only happens if the router is served without connect info
            return Self(Ipv4Addr::UNSPECIFIED.into());
        };

        let Some(RealIpConfig { header, set_from }) = real_ip_config else {
            return Self(client_ip);
        };

        let header_value = request.headers().get(header);

        if *set_from != client_ip {
            if let Some(header_value) = header_value {
                debug!(%client_ip, ?header_value, "ignoring real ip header value from untrusted source");
            }
            return Self(client_ip);
        }

        let Some(header_value) = header_value else {
            warn!(%client_ip, "real ip header not found");
            return Self(client_ip);
        };

        let Some(real_ip) = header_value
            .to_str()
            .ok()
            .and_then(|real_ip| real_ip.trim().parse().ok())
        else {
            error!(%client_ip, ?header_value, "failed to parse real ip header value");
            return Self(client_ip);
        };

        Self(real_ip)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    use axum::body::Body;

    use super::*;

    const PROXY: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn request(peer: IpAddr, real_ip: Option<&str>) -> Request {
        let mut request = Request::builder();
        if let Some(real_ip) = real_ip {
            request = request.header("X-Real-Ip", real_ip);
        }
        let mut request = request.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::new(peer, 4242)));
        request
    }

    fn config() -> RealIpConfig {
        RealIpConfig {
            header: "X-Real-Ip".into(),
            set_from: PROXY,
        }
    }

    #[test]
    fn peer_address_without_config() {
        let peer = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let result = ClientIp::from_request(&request(peer, Some("10.0.0.1")), None);
        assert_eq!(result, ClientIp(peer));
    }

    #[test]
    fn header_from_trusted_proxy() {
        let result = ClientIp::from_request(&request(PROXY, Some("10.0.0.1")), Some(&config()));
        assert_eq!(result, ClientIp([10, 0, 0, 1].into()));
    }

    #[test]
    fn header_from_untrusted_source() {
        let peer = [192, 168, 1, 2].into();
        let result = ClientIp::from_request(&request(peer, Some("10.0.0.1")), Some(&config()));
        assert_eq!(result, ClientIp(peer));
    }

    #[test]
    fn invalid_header() {
        let result = ClientIp::from_request(&request(PROXY, Some("nope")), Some(&config()));
        assert_eq!(result, ClientIp(PROXY));
    }

    #[test]
    fn missing_connect_info() {
        let request = Request::new(Body::empty());
        let result = ClientIp::from_request(&request, None);
        assert_eq!(result, ClientIp(Ipv4Addr::UNSPECIFIED.into()));
    }
}

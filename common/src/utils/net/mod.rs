use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result, bail};

/// Split `host:port` into its parts. Bracketed IPv6 hosts (`[::1]:80`) are unwrapped.
pub fn split_host_port(addr: &str) -> Result<(&str, u16)> {
    let Some((host, port)) = addr.rsplit_once(':') else {
        bail!("address [{addr}] has no port");
    };
    let host = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')).unwrap_or(host);
    if host.is_empty() {
        bail!("address [{addr}] has an empty host");
    }
    let port = parse_port(port).with_context(|| format!("address [{addr}] has an invalid port"))?;
    Ok((host, port))
}

/// Parse a non-zero TCP port.
pub fn parse_port(port: &str) -> Result<u16> {
    let port: u16 = port.trim().parse().with_context(|| format!("[{port}] is not a port number"))?;
    if port == 0 {
        bail!("port must not be 0");
    }
    Ok(port)
}

/// Whether `host` is an IP literal or a syntactically valid DNS name.
pub fn is_valid_host(host: &str) -> bool {
    if host.parse::<IpAddr>().is_ok() {
        return true;
    }
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Extract the domain or IP address from a URL-ish string.
pub fn extract_domain_or_ip(domain: &str) -> Option<String> {
    let last = domain.split("://").last()?;
    let last = last.split('/').next()?;
    if last.starts_with('[') {
        return last.split(']').next().map(|h| h.trim_start_matches('[').to_string());
    }
    let domain = match last.rsplit_once(':') {
        Some((host, _)) => host,
        None => last,
    };
    if domain.is_empty() { None } else { Some(domain.to_string()) }
}

/// Resolve `host` to socket addresses for `port`.
pub async fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("resolve [{host}] failed"))?
        .collect();
    if addrs.is_empty() {
        bail!("[{host}] resolved to no addresses");
    }
    Ok(addrs)
}

use std::env;

use crate::error::ConfigError;

/// Turns the configured storage bind address into the address a remote
/// client should use. Inside the cluster the daemon usually binds to
/// all interfaces, but peers need a routable, identity-specific name;
/// this bridges the two without the operator supplying both.
///
/// - an empty host becomes `localhost`;
/// - `0.0.0.0` becomes the pod identity from `$HOSTNAME`, falling back
///   to the machine's own host name;
/// - any other host is returned unchanged.
///
/// The port is preserved verbatim. An address without a `:` separator
/// is a configuration error.
pub fn determine_advertised_address(address: &str) -> Result<String, ConfigError> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| ConfigError::InvalidAddress(address.to_string()))?;

    let host = match host {
        "" => "localhost".to_string(),
        "0.0.0.0" => match env::var("HOSTNAME") {
            Ok(name) if !name.is_empty() => name,
            _ => hostname::get()
                .map_err(ConfigError::Hostname)?
                .to_string_lossy()
                .into_owned(),
        },
        other => other.to_string(),
    };

    Ok(format!("{host}:{port}"))
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn with_hostname_var<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let saved = env::var("HOSTNAME").ok();
        match value {
            Some(v) => env::set_var("HOSTNAME", v),
            None => env::remove_var("HOSTNAME"),
        }
        let out = f();
        match saved {
            Some(v) => env::set_var("HOSTNAME", v),
            None => env::remove_var("HOSTNAME"),
        }
        out
    }

    #[test]
    fn empty_host_becomes_localhost() {
        assert_eq!(
            determine_advertised_address(":9090").unwrap(),
            "localhost:9090"
        );
    }

    #[test]
    #[serial]
    fn wildcard_host_uses_pod_identity() {
        let addr = with_hostname_var(Some("source-controller-0"), || {
            determine_advertised_address("0.0.0.0:9090").unwrap()
        });
        assert_eq!(addr, "source-controller-0:9090");
    }

    #[test]
    #[serial]
    fn wildcard_host_falls_back_to_machine_hostname() {
        let addr = with_hostname_var(None, || {
            determine_advertised_address("0.0.0.0:9090").unwrap()
        });
        let expected = hostname::get().unwrap().to_string_lossy().into_owned();
        assert_eq!(addr, format!("{expected}:9090"));
    }

    #[test]
    fn concrete_host_round_trips() {
        assert_eq!(
            determine_advertised_address("artifacts.cluster.local:8080").unwrap(),
            "artifacts.cluster.local:8080"
        );
    }

    #[test]
    fn missing_separator_is_rejected() {
        let err = determine_advertised_address("localhost").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress(addr) if addr == "localhost"));
    }
}

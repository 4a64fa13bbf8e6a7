use ddnscrab::error::Error;
use ddnscrab::host_store::DynHostStore;
use ddnscrab::{Host, HostStore, InMemoryHostStore, PipeBackend, Zone};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

const HELO: &str = "HELO\t1\n";
const OK: &str = "OK\tDDNS Crab Backend\n";
const DAY: Duration = Duration::from_secs(86_400);

async fn store_with(hosts: &[(&str, &str)]) -> Arc<InMemoryHostStore> {
    let store = Arc::new(InMemoryHostStore::new(DAY));
    for (hostname, ip) in hosts {
        store
            .set_host(&Host {
                hostname: (*hostname).to_string(),
                ip: (*ip).to_string(),
                token: "abc".to_string(),
            })
            .await
            .unwrap();
    }
    store
}

async fn exchange(store: Arc<InMemoryHostStore>, requests: &str) -> Vec<String> {
    exchange_with(store, false, requests).await
}

async fn exchange_with(store: DynHostStore, verbose: bool, requests: &str) -> Vec<String> {
    let backend = PipeBackend::new(Zone::new(".d.example.org", "ns.example.org"), store, verbose);
    let input = format!("{HELO}{requests}");
    let mut output = Vec::new();
    backend.run(input.as_bytes(), &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    let rest = output.strip_prefix(OK).expect("handshake acknowledged first");
    rest.lines().map(ToString::to_string).collect()
}

fn data_lines(lines: &[String]) -> Vec<&String> {
    lines.iter().filter(|l| l.starts_with("DATA\t")).collect()
}

#[tokio::test]
async fn test_end_to_end_a_query() {
    let store = store_with(&[("pi", "10.0.0.9")]).await;
    let lines = exchange(store, "Q\tpi.d.example.org.\tIN\tA\t123\t0.0.0.0\n").await;
    assert_eq!(
        lines,
        ["DATA\tpi.d.example.org.\tIN\tA\t10\t123\t10.0.0.9", "END"]
    );
}

#[tokio::test]
async fn test_ipv4_host() {
    let store = store_with(&[("h", "203.0.113.5")]).await;
    let lines = exchange(store, "Q\th.d.example.org\tIN\tA\t1\t192.0.2.1\n").await;
    assert_eq!(
        lines,
        ["DATA\th.d.example.org\tIN\tA\t10\t1\t203.0.113.5", "END"]
    );
}

#[tokio::test]
async fn test_ipv6_host_any_query() {
    let store = store_with(&[("h", "2001:db8::1")]).await;
    let lines = exchange(store, "Q\th.d.example.org\tIN\tANY\t-1\t192.0.2.1\n").await;
    assert_eq!(
        lines,
        ["DATA\th.d.example.org\tIN\tAAAA\t10\t-1\t2001:db8::1", "END"]
    );
}

#[tokio::test]
async fn test_soa_serial_is_current_time() {
    let before = OffsetDateTime::now_utc().unix_timestamp();
    let store = store_with(&[]).await;
    let lines = exchange(store, "Q\td.example.org\tIN\tSOA\t5\t192.0.2.1\n").await;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "END");

    let fields: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(fields[..6], ["DATA", "d.example.org", "IN", "SOA", "10", "5"]);
    let soa: Vec<&str> = fields[6].split(' ').collect();
    assert_eq!(soa[..2], ["ns.example.org.", "hostmaster.example.com."]);
    let serial: i64 = soa[2].parse().unwrap();
    assert!(serial >= before);
    assert!(serial <= OffsetDateTime::now_utc().unix_timestamp());
    assert_eq!(soa[3..], ["1800", "3600", "7200", "5"]);
}

#[tokio::test]
async fn test_ns() {
    let store = store_with(&[]).await;
    let lines = exchange(store, "Q\td.example.org\tIN\tNS\t5\t192.0.2.1\n").await;
    assert_eq!(
        lines,
        ["DATA\td.example.org\tIN\tNS\t10\t5\tns.example.org.", "END"]
    );
}

#[tokio::test]
async fn test_wrong_field_counts_only_terminate() {
    let store = store_with(&[("pi", "10.0.0.9")]).await;
    let requests = [
        "",
        "Q",
        "Q\tpi.d.example.org.\tIN\tA\t123",
        "Q\tpi.d.example.org.\tIN\tA\t123\t0.0.0.0\textra",
        "AXFR\t1\td.example.org.",
    ];
    for request in requests {
        let lines = exchange(store.clone(), &format!("{request}\n")).await;
        assert_eq!(lines, ["END"], "{request:?}");
    }
}

#[tokio::test]
async fn test_names_outside_zone() {
    let store = store_with(&[("pi", "10.0.0.9")]).await;
    for name in ["pi.example.org", "pi.d.example.com.", "d.example.org", "example"] {
        for qtype in ["A", "ANY"] {
            let request = format!("Q\t{name}\tIN\t{qtype}\t1\t0.0.0.0\n");
            let lines = exchange(store.clone(), &request).await;
            assert!(data_lines(&lines).is_empty(), "{name} {qtype}");
            assert_eq!(lines, ["END"]);
        }
    }
}

#[tokio::test]
async fn test_unknown_host() {
    let store = store_with(&[("pi", "10.0.0.9")]).await;
    let lines = exchange(store, "Q\tnope.d.example.org\tIN\tA\t1\t0.0.0.0\n").await;
    assert_eq!(lines, ["END"]);
}

#[tokio::test(start_paused = true)]
async fn test_expired_host_is_unknown() {
    let store = store_with(&[("pi", "10.0.0.9")]).await;
    tokio::time::advance(DAY).await;
    let lines = exchange(store, "Q\tpi.d.example.org\tIN\tA\t1\t0.0.0.0\n").await;
    assert_eq!(lines, ["END"]);
}

#[tokio::test]
async fn test_unsupported_types() {
    let store = store_with(&[("pi", "10.0.0.9")]).await;
    for qtype in ["AAAA", "MX", "TXT", "CNAME", "PTR"] {
        let request = format!("Q\tpi.d.example.org\tIN\t{qtype}\t1\t0.0.0.0\n");
        let lines = exchange(store.clone(), &request).await;
        assert_eq!(lines, ["END"], "{qtype}");
    }
}

#[tokio::test]
async fn test_one_end_per_request() {
    let store = store_with(&[("pi", "10.0.0.9"), ("six", "2001:db8::1")]).await;
    let requests = "Q\tpi.d.example.org\tIN\tANY\t1\t0.0.0.0\n\
                    bogus\n\
                    Q\tsix.d.example.org\tIN\tANY\t2\t0.0.0.0\n\
                    Q\tmissing.d.example.org\tIN\tANY\t3\t0.0.0.0\n\
                    Q\td.example.org\tIN\tNS\t4\t0.0.0.0\n";
    let lines = exchange(store, requests).await;
    assert_eq!(
        lines,
        [
            "DATA\tpi.d.example.org\tIN\tA\t10\t1\t10.0.0.9",
            "END",
            "END",
            "DATA\tsix.d.example.org\tIN\tAAAA\t10\t2\t2001:db8::1",
            "END",
            "END",
            "DATA\td.example.org\tIN\tNS\t10\t4\tns.example.org.",
            "END",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_repeated_set_host_is_idempotent() {
    let store = store_with(&[]).await;
    let host = Host::register("pi", "10.0.0.9");
    store.set_host(&host).await.unwrap();

    tokio::time::advance(DAY / 2).await;
    store.set_host(&host).await.unwrap();
    assert_eq!(store.get_host("pi").await.unwrap(), host);
    assert_eq!(store.ttl("pi").await, Some(DAY));
}

/// A store whose hosts all come back broken: "pi" is missing its address, anything else fails
/// in transport.
struct BrokenStore;

#[async_trait::async_trait]
impl HostStore for BrokenStore {
    async fn get_host(&self, hostname: &str) -> Result<Host, Error> {
        if hostname == "pi" {
            return Err(Error::MalformedHost(hostname.to_string(), "ip"));
        }
        Err(Error::Redis(redis::RedisError::from(std::io::Error::from(
            std::io::ErrorKind::ConnectionRefused,
        ))))
    }

    async fn set_host(&self, _host: &Host) -> Result<(), Error> {
        Ok(())
    }
}

#[tokio::test]
async fn test_store_error_only_terminates() {
    let lines = exchange_with(
        Arc::new(BrokenStore),
        false,
        "Q\tpi.d.example.org\tIN\tA\t1\t0.0.0.0\n",
    )
    .await;
    assert_eq!(lines, ["END"]);
}

#[tokio::test]
async fn test_store_error_is_logged_when_verbose() {
    let lines = exchange_with(
        Arc::new(BrokenStore),
        true,
        "Q\tpi.d.example.org\tIN\tA\t1\t0.0.0.0\n",
    )
    .await;
    assert_eq!(
        lines,
        [
            "LOG\t'Q\tpi.d.example.org\tIN\tA\t1\t0.0.0.0'",
            "LOG\t'host \"pi\" is missing field \"ip\"'",
            "END",
        ]
    );
}

#[tokio::test]
async fn test_serving_continues_after_store_errors() {
    let requests = concat!(
        "Q\tpi.d.example.org\tIN\tA\t1\t0.0.0.0\n",
        "Q\tgone.d.example.org\tIN\tANY\t2\t0.0.0.0\n",
        "Q\td.example.org\tIN\tNS\t3\t0.0.0.0\n",
    );
    let lines = exchange_with(Arc::new(BrokenStore), false, requests).await;
    assert_eq!(
        lines,
        [
            "END",
            "END",
            "DATA\td.example.org\tIN\tNS\t10\t3\tns.example.org.",
            "END",
        ]
    );
}

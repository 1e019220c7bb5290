use anyhow::Result;
use std::fs;
use tempfile::TempDir;
use trustlog_providers::{DiscoveryConfig, Error, SourceAdapter};

const NODE_LOG: &str = "\
Connect to serial port /dev/ttyUSB0
2021-03-04 12:00:00,000 # Starting Contiki-NG
2021-03-04 12:00:00,010 # [INFO: main      ] Node ID: 11222
2021-03-04 12:00:01,250 # [INFO: A-envmon  ] Generated message (len=10)\r
2021-03-04 12:00:01,300 # [INFO: A-envmon  ] Message sent to coap://[fd00::1]:5683
";

fn results_dir() -> Result<TempDir> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("wsn.wsn3.cr.pyterm.log"), NODE_LOG)?;
    fs::write(dir.path().join("wsn.wsn1.cr.pyterm.log"), NODE_LOG)?;
    fs::write(dir.path().join("edge.rpi1.cr.pyterm.log"), NODE_LOG)?;
    fs::write(dir.path().join("wsn.wsn2.cr.pcap"), b"\x00\x01")?;
    fs::create_dir(dir.path().join("wsn.wsn4.cr.pyterm.log.d"))?;
    Ok(dir)
}

#[test]
fn test_scan_sorts_sensor_nodes() -> Result<()> {
    let dir = results_dir()?;
    let adapter = SourceAdapter::pyterm(DiscoveryConfig::default());

    let files = adapter.scan(dir.path())?;
    let hosts: Vec<&str> = files.iter().map(|f| f.hostname.as_str()).collect();

    assert_eq!(hosts, vec!["wsn1", "wsn3"]);
    assert!(files.iter().all(|f| f.variant.as_deref() == Some("cr")));
    Ok(())
}

#[test]
fn test_scan_with_other_kind() -> Result<()> {
    let dir = results_dir()?;
    let adapter = SourceAdapter::pyterm(DiscoveryConfig {
        kind: "edge".to_string(),
        ..DiscoveryConfig::default()
    });

    let files = adapter.scan(dir.path())?;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].hostname, "rpi1");
    Ok(())
}

#[test]
fn test_read_records_skips_banner_lines() -> Result<()> {
    let dir = results_dir()?;
    let adapter = SourceAdapter::pyterm(DiscoveryConfig::default());

    let records = adapter.read_records(&dir.path().join("wsn.wsn1.cr.pyterm.log"))?;
    let modules: Vec<&str> = records.iter().map(|r| r.module.as_str()).collect();

    assert_eq!(modules, vec!["main", "A-envmon", "A-envmon"]);
    assert_eq!(records[1].message, "Generated message (len=10)");
    assert_eq!(records[2].level, "INFO");
    Ok(())
}

#[test]
fn test_unrecognized_file_is_rejected() -> Result<()> {
    let dir = results_dir()?;
    let adapter = SourceAdapter::pyterm(DiscoveryConfig::default());

    let err = adapter
        .read_records(&dir.path().join("wsn.wsn2.cr.pcap"))
        .unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
    Ok(())
}

#[test]
fn test_scan_missing_directory() {
    let adapter = SourceAdapter::pyterm(DiscoveryConfig::default());
    let err = adapter
        .scan(std::path::Path::new("/nonexistent/results"))
        .unwrap_err();

    assert!(matches!(err, Error::NotADirectory(_)));
}

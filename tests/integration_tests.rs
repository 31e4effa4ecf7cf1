use anyhow::Result;
use cpf_phone_extractor::{
    BatchFetcher, ExtractorConfig, ExtractorError, HttpLookupClient, LocalStorage, NoProgress,
    ReportLayout, ReportWriter, Session,
};
use httpmock::prelude::*;
use std::io::Read;
use tempfile::TempDir;

fn report_writer(
    server: &MockServer,
    temp_dir: &TempDir,
) -> Result<ReportWriter<HttpLookupClient, LocalStorage>> {
    let config = ExtractorConfig {
        concurrent_requests: 4,
        ..ExtractorConfig::default()
    }
    .with_endpoint(server.url("/api/cpf"));

    let lookup = HttpLookupClient::new(&config)?;
    Ok(ReportWriter::new(
        BatchFetcher::from_config(lookup, &config),
        LocalStorage::new(temp_dir.path().to_str().unwrap().to_string()),
        ReportLayout::from_config(&config),
    ))
}

fn read_part(path: &std::path::Path, name: &str) -> Result<String> {
    let data = std::fs::read(path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;
    let mut part = archive.by_name(name)?;
    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(content)
}

fn mock_found<'a>(server: &'a MockServer, cpf: &str, ddd: &str, phone: &str) -> httpmock::Mock<'a> {
    let body = serde_json::json!({
        "status": "success",
        "result": {"ddd": ddd, "telefone": phone}
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/cpf").query_param("cpf", cpf);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

fn mock_missing<'a>(server: &'a MockServer, cpf: &str) -> httpmock::Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path("/api/cpf").query_param("cpf", cpf);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"status": "failure"}));
    })
}

#[tokio::test]
async fn test_found_and_missing_rows_in_input_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("cpfs.txt"), "111\n222\n")?;

    let server = MockServer::start();
    let found = mock_found(&server, "111", "11", "91234-5678");
    let missing = mock_missing(&server, "222");

    let report = report_writer(&server, &temp_dir)?;
    let mut session = Session::new("cpfs.txt\nresult.xlsx\n".as_bytes(), Vec::new());
    let summary = session.run(&report, &NoProgress).await?;

    found.assert();
    missing.assert();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.found, 1);

    let workbook = temp_dir.path().join("result.xlsx");
    assert!(workbook.exists());

    let sheet = read_part(&workbook, "xl/worksheets/sheet1.xml")?;
    assert_eq!(sheet.matches("<row ").count(), 3);

    let strings = read_part(&workbook, "xl/sharedStrings.xml")?;
    let positions: Vec<usize> = [">111<", ">11 91234-5678<", ">222<", ">Not Found<"]
        .iter()
        .map(|needle| strings.find(needle).expect(needle))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    Ok(())
}

#[tokio::test]
async fn test_empty_input_writes_header_only() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("empty.txt"), "")?;

    let server = MockServer::start();
    let any_lookup = server.mock(|when, then| {
        when.method(GET).path("/api/cpf");
        then.status(200).json_body(serde_json::json!({"status": "failure"}));
    });

    let report = report_writer(&server, &temp_dir)?;
    let mut session = Session::new("empty\nout\n".as_bytes(), Vec::new());
    let summary = session.run(&report, &NoProgress).await?;

    any_lookup.assert_hits(0);
    assert_eq!(summary.rows, 0);
    assert_eq!(summary.output_path, "out.xlsx");

    let sheet = read_part(&temp_dir.path().join("out.xlsx"), "xl/worksheets/sheet1.xml")?;
    assert_eq!(sheet.matches("<row ").count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_input_name_without_extension_gets_txt() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("combolist_23.txt"), " 111 \n")?;

    let server = MockServer::start();
    let found = mock_found(&server, "111", " 21 ", " 3333-4444 ");

    let report = report_writer(&server, &temp_dir)?;
    let mut session = Session::new("combolist_23\ncombolist_23\n".as_bytes(), Vec::new());
    let summary = session.run(&report, &NoProgress).await?;

    found.assert();
    assert_eq!(summary.output_path, "combolist_23.xlsx");
    assert_eq!(summary.found, 1);

    let strings = read_part(
        &temp_dir.path().join("combolist_23.xlsx"),
        "xl/sharedStrings.xml",
    )?;
    assert!(strings.contains(">21 3333-4444<"));

    Ok(())
}

#[tokio::test]
async fn test_existing_output_is_rejected_and_lookups_run_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("cpfs.txt"), "111\n")?;
    std::fs::write(temp_dir.path().join("taken.xlsx"), "keep me")?;

    let server = MockServer::start();
    let found = mock_found(&server, "111", "11", "91234-5678");

    let report = report_writer(&server, &temp_dir)?;
    let mut session = Session::new("cpfs\ntaken\nfresh\n".as_bytes(), Vec::new());
    let summary = session.run(&report, &NoProgress).await?;

    found.assert_hits(1);
    assert_eq!(summary.output_path, "fresh.xlsx");
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("taken.xlsx"))?,
        "keep me"
    );
    assert!(temp_dir.path().join("fresh.xlsx").exists());

    let transcript = String::from_utf8(session.into_writer())?;
    assert!(transcript.contains("already exists"));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_identifiers_produce_duplicate_rows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("dupes.txt"), "111\n111\n111\n")?;

    let server = MockServer::start();
    let found = mock_found(&server, "111", "11", "91234-5678");

    let report = report_writer(&server, &temp_dir)?;
    let mut session = Session::new("dupes\ndupes\n".as_bytes(), Vec::new());
    let summary = session.run(&report, &NoProgress).await?;

    found.assert_hits(3);
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.found, 3);

    let sheet = read_part(&temp_dir.path().join("dupes.xlsx"), "xl/worksheets/sheet1.xml")?;
    assert_eq!(sheet.matches("<row ").count(), 4);

    Ok(())
}

#[tokio::test]
async fn test_output_created_during_lookups_is_not_replaced() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("cpfs.txt"), "111\n")?;

    let server = MockServer::start();
    let slow = server.mock(|when, then| {
        when.method(GET).path("/api/cpf").query_param("cpf", "111");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "success",
                "result": {"ddd": "11", "telefone": "91234-5678"}
            }))
            .delay(std::time::Duration::from_millis(300));
    });

    let report = report_writer(&server, &temp_dir)?;
    let target = temp_dir.path().join("out.xlsx");
    let writer = {
        let target = target.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(100));
            std::fs::write(target, "precious")
        })
    };

    let mut session = Session::new("cpfs\nout\n".as_bytes(), Vec::new());
    let outcome = session.run(&report, &NoProgress).await;
    writer.join().expect("writer thread panicked")?;

    slow.assert_hits(1);
    assert!(matches!(
        outcome,
        Err(ExtractorError::OutputAlreadyExists { ref path }) if path == "out.xlsx"
    ));
    assert_eq!(std::fs::read_to_string(&target)?, "precious");

    Ok(())
}

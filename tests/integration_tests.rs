use coletor::core::cascade::{Cascade, Completion, LevelState, OptionItem};
use coletor::core::export::{FLAT_FILENAME, GROUPED_FILENAME};
use coletor::core::session::{CITY_LEVEL, REGION_LEVEL};
use coletor::domain::model::ExportMode;
use coletor::{ColetorError, IbgeCatalog, JsonFileStorage, Session};
use httpmock::prelude::*;
use tempfile::TempDir;

fn mock_catalog(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/estados").query_param("orderBy", "nome");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id": 33, "sigla": "RJ", "nome": "Rio de Janeiro"},
                {"id": 35, "sigla": "SP", "nome": "São Paulo"}
            ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/estados/SP/municipios");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id": 1, "nome": "São Paulo"},
                {"id": 2, "nome": "Campinas"}
            ]));
    });
}

async fn started_session(
    server: &MockServer,
    data_dir: &std::path::Path,
) -> Session<IbgeCatalog, JsonFileStorage> {
    let catalog = IbgeCatalog::new(server.base_url());
    let storage = JsonFileStorage::new(data_dir);
    let mut session = Session::new(catalog, storage, Cascade::remote_two_level());
    assert!(session.start().await.unwrap());
    session
}

fn read_part(path: &std::path::Path, part: &str) -> String {
    let bytes = std::fs::read(path).unwrap();
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();
    let mut file = archive.by_name(part).unwrap();
    let mut content = String::new();
    std::io::Read::read_to_string(&mut file, &mut content).unwrap();
    content
}

fn cell_texts(path: &std::path::Path, part: &str) -> Vec<String> {
    read_part(path, part)
        .split(r#"<t xml:space="preserve">"#)
        .skip(1)
        .map(|rest| rest.split("</t>").next().unwrap().to_string())
        .collect()
}

fn sheet_names(path: &std::path::Path) -> Vec<String> {
    read_part(path, "xl/workbook.xml")
        .split(r#"<sheet name=""#)
        .skip(1)
        .map(|rest| rest.split('"').next().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_table_grows_by_one_row_per_successful_submission() {
    let server = MockServer::start();
    mock_catalog(&server);
    let temp_dir = TempDir::new().unwrap();
    let mut session = started_session(&server, temp_dir.path()).await;

    session.select_region("SP").await.unwrap();
    session.select_city("Campinas").unwrap();

    for (i, name) in ["Ana", "Bia", "Caio"].iter().enumerate() {
        session.submit(name, "111", Some("Centro")).await.unwrap();
        assert_eq!(session.table().lines().count(), 2 + i + 1);
    }

    // Submission order is table order.
    let rendered = session.table();
    let positions: Vec<usize> = ["Ana", "Bia", "Caio"]
        .iter()
        .map(|n| rendered.find(n).unwrap())
        .collect();
    assert!(positions[0] < positions[1] && positions[1] < positions[2]);
}

#[tokio::test]
async fn test_blank_field_never_grows_the_store_or_clears_selection() {
    let server = MockServer::start();
    mock_catalog(&server);
    let temp_dir = TempDir::new().unwrap();
    let mut session = started_session(&server, temp_dir.path()).await;

    session.select_region("SP").await.unwrap();
    session.select_city("Campinas").unwrap();

    let err = session.submit("Ana", "  ", Some("Centro")).await.unwrap_err();
    assert!(matches!(err, ColetorError::Validation { .. }));
    assert_eq!(session.record_count(), 0);
    assert_eq!(session.cascade().selected_value(REGION_LEVEL), Some("SP"));
    assert_eq!(session.cascade().selected_value(CITY_LEVEL), Some("Campinas"));
}

#[tokio::test]
async fn test_restart_restores_persisted_records_in_order() {
    let server = MockServer::start();
    mock_catalog(&server);
    let temp_dir = TempDir::new().unwrap();

    let table_before = {
        let mut session = started_session(&server, temp_dir.path()).await;
        session.select_region("SP").await.unwrap();
        session.select_city("São Paulo").unwrap();
        session.submit("Ana", "111", Some("Centro")).await.unwrap();
        session.submit("Bia", "222", Some("Norte")).await.unwrap();
        session.table()
    };

    // Fresh session over the same data directory, as after a reload.
    let session = started_session(&server, temp_dir.path()).await;
    assert_eq!(session.record_count(), 2);
    assert_eq!(session.table(), table_before);
}

#[tokio::test]
async fn test_flat_export_matches_records_positionally() {
    let server = MockServer::start();
    mock_catalog(&server);
    let temp_dir = TempDir::new().unwrap();
    let mut session = started_session(&server, temp_dir.path()).await;

    session.select_region("SP").await.unwrap();
    session.select_city("São Paulo").unwrap();
    session.submit("Ana", "111", Some("Centro")).await.unwrap();
    session.submit("Bia", "222", Some("Centro")).await.unwrap();

    let path = session.export(ExportMode::Flat).await.unwrap();
    let path = std::path::PathBuf::from(path);
    assert!(path.ends_with(FLAT_FILENAME));

    assert_eq!(sheet_names(&path), vec!["Dados Coletados"]);
    let sheet = read_part(&path, "xl/worksheets/sheet1.xml");
    assert_eq!(sheet.matches("<row ").count(), 3); // header + 2 data rows
    assert_eq!(
        cell_texts(&path, "xl/worksheets/sheet1.xml"),
        vec![
            "Nome", "Contato", "Estado", "Cidade", "Bairro", //
            "Ana", "111", "São Paulo", "São Paulo", "Centro", //
            "Bia", "222", "São Paulo", "São Paulo", "Centro",
        ]
    );
}

#[tokio::test]
async fn test_grouped_export_partitions_by_neighborhood_in_first_seen_order() {
    let server = MockServer::start();
    mock_catalog(&server);
    let temp_dir = TempDir::new().unwrap();
    let mut session = started_session(&server, temp_dir.path()).await;

    session.select_region("SP").await.unwrap();
    session.select_city("São Paulo").unwrap();
    session.submit("Ana", "111", Some("Centro")).await.unwrap();
    session.submit("Bia", "222", Some("Centro")).await.unwrap();
    session.submit("Caio", "333", Some("Norte")).await.unwrap();

    let path = session.export(ExportMode::Grouped).await.unwrap();
    let path = std::path::PathBuf::from(path);
    assert!(path.ends_with(GROUPED_FILENAME));

    assert_eq!(sheet_names(&path), vec!["Centro", "Norte"]);
    let centro = read_part(&path, "xl/worksheets/sheet1.xml");
    assert_eq!(centro.matches("<row ").count(), 3); // header + 2
    let norte = read_part(&path, "xl/worksheets/sheet2.xml");
    assert_eq!(norte.matches("<row ").count(), 2); // header + 1
}

#[tokio::test]
async fn test_empty_export_produces_no_file_and_leaves_store_unchanged() {
    let server = MockServer::start();
    mock_catalog(&server);
    let temp_dir = TempDir::new().unwrap();
    let session = started_session(&server, temp_dir.path()).await;

    let err = session.export(ExportMode::Flat).await.unwrap_err();
    assert!(matches!(err, ColetorError::EmptyDataset));
    assert!(!temp_dir.path().join(FLAT_FILENAME).exists());
    assert_eq!(session.record_count(), 0);
}

#[tokio::test]
async fn test_region_change_during_pending_fetch_ignores_the_stale_response() {
    // Driven at the cascade level: the session awaits each fetch inline, so
    // the overlap is reproduced by completing the tickets out of order.
    let mut cascade = Cascade::remote_two_level();
    let ticket = cascade.begin_root_load();
    cascade.complete_options(
        &ticket,
        vec![OptionItem::new("SP", "São Paulo"), OptionItem::new("RJ", "Rio de Janeiro")],
    );

    let sp_ticket = cascade.select(REGION_LEVEL, "SP").unwrap().unwrap();
    let rj_ticket = cascade.select(REGION_LEVEL, "RJ").unwrap().unwrap();

    // The SP listing arrives after the user already switched to RJ.
    let outcome = cascade.complete_options(&sp_ticket, vec![OptionItem::same("Campinas")]);
    assert_eq!(outcome, Completion::Discarded);
    assert_eq!(
        cascade.state(CITY_LEVEL),
        &LevelState::Loading { parent: "RJ".to_string() }
    );

    cascade.complete_options(&rj_ticket, vec![OptionItem::same("Niterói")]);
    let cities: Vec<&str> = cascade
        .options(CITY_LEVEL)
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    assert_eq!(cities, vec!["Niterói"]);
}

#[tokio::test]
async fn test_catalog_outage_leaves_selectors_recoverable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/estados").query_param("orderBy", "nome");
        then.status(500);
    });

    let temp_dir = TempDir::new().unwrap();
    let catalog = IbgeCatalog::new(server.base_url());
    let storage = JsonFileStorage::new(temp_dir.path());
    let mut session = Session::new(catalog, storage, Cascade::remote_two_level());

    // Startup survives the outage; the region selector stays in its default
    // empty state and nothing is selectable.
    assert!(!session.start().await.unwrap());
    assert!(session.cascade().options(REGION_LEVEL).is_empty());
    assert!(session.select_region("SP").await.is_err());
}

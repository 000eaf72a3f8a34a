//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the d-TPP search pages and
//! exercise cycle lookup, pagination, filters and batch listing end-to-end.

use std::time::Duration;
use terminal_procedures::config::Config;
use terminal_procedures::{
    CycleKind, FlagMeaning, ListOptions, Listing, PageOutcome, ProceduresClient, TppError,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const SEARCH_PATH: &str = "/dtpp/search/";
const RESULTS_PATH: &str = "/dtpp/search/results/";

/// Matches requests that do not carry the given query parameter
struct QueryParamMissing(&'static str);

impl Match for QueryParamMissing {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == self.0)
    }
}

fn create_client(server: &MockServer) -> ProceduresClient {
    let mut config = Config::default();
    config.source.base_url = format!("{}{}", server.uri(), SEARCH_PATH);
    ProceduresClient::new(&config).expect("Failed to create client")
}

fn landing_page(options: &str) -> String {
    format!(
        r#"<html><body><form action="results/">
        <select id="cycle" name="cycle">{options}</select>
        <input name="ident" />
        </form></body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn row(ident: &str, flag: &str, procedure_type: &str, name: &str) -> String {
    format!(
        r#"<tr><td>AK</td><td>ANCHORAGE</td><td>TED STEVENS ANCHORAGE INTL</td>
        <td>{ident}</td><td>AK-1</td><td>{flag}</td><td>{procedure_type}</td>
        <td><a href="https://aeronav.faa.gov/d-tpp/1801/{name}.PDF">{name}</a></td>
        <td><a href="https://aeronav.faa.gov/d-tpp/1801/compare_pdf/{name}_CMP.PDF">Compare</a></td></tr>"#
    )
}

fn results_page(rows: &[String], page_count: u32) -> String {
    let pagination = if page_count > 0 {
        let links: String = (1..=page_count)
            .map(|page| format!(r#"<li><a href="?ident=PANC&page={page}">{page}</a></li>"#))
            .collect();
        format!(
            r#"<ul class="pagination">{links}<li><a href="?ident=PANC&page=2">&raquo;</a></li></ul>"#
        )
    } else {
        String::new()
    };

    format!(
        r#"<html><body>
        <div id="resultsSummary">Showing results for JAN 18 - FEB 14, 2018 [1801]</div>
        <table id="resultsTable">
            <thead><tr><th>State</th><th>City</th><th>Airport</th><th>Ident</th><th>Vol</th>
            <th>Flag</th><th>Type</th><th>Procedure</th><th>Compare</th></tr></thead>
            <tbody>{}</tbody>
        </table>
        {pagination}
        </body></html>"#,
        rows.concat()
    )
}

fn no_results_page() -> String {
    r#"<html><body><div class="alert alert-info">No results found.</div></body></html>"#
        .to_string()
}

async fn mount_landing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(html(landing_page(
            r#"<option value="1801">Current 1801</option><option value="1802">Next 1802</option>"#,
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_current_cycle() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    let client = create_client(&server);

    let cycle = client
        .resolve_cycle(CycleKind::Current)
        .await
        .expect("Cycle lookup failed")
        .expect("Current cycle missing");
    assert_eq!(cycle.label, "Current 1801");
    assert_eq!(cycle.code, "1801");

    assert_eq!(
        client.resolve_current_cycle_code().await.unwrap(),
        Some("1801".to_string())
    );
    assert_eq!(
        client.resolve_next_cycle_code().await.unwrap(),
        Some("1802".to_string())
    );
}

#[tokio::test]
async fn test_unpublished_next_cycle_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(html(landing_page(
            r#"<option value="1801">Current 1801</option>"#,
        )))
        .mount(&server)
        .await;
    let client = create_client(&server);

    assert_eq!(client.resolve_cycle(CycleKind::Next).await.unwrap(), None);
    assert_eq!(client.resolve_next_cycle_code().await.unwrap(), None);
    assert_eq!(client.effective_dates_for(CycleKind::Next).await.unwrap(), None);
}

#[tokio::test]
async fn test_each_cycle_lookup_refetches_landing_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(header("accept", "text/html"))
        .respond_with(html(landing_page(
            r#"<option value="1801">Current 1801</option>"#,
        )))
        .expect(2)
        .mount(&server)
        .await;
    let client = create_client(&server);

    client.resolve_current_cycle_code().await.unwrap();
    client.fetch_current_cycle().await.unwrap();
}

#[tokio::test]
async fn test_current_cycle_effective_dates_from_label() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(html(landing_page(
            "<option value=\"1801\">\n\t\tCurrent Cycle:\tJAN 18 -\n FEB 14, 2018 [1801]\n</option>",
        )))
        .mount(&server)
        .await;
    let client = create_client(&server);

    let range = client
        .current_cycle_effective_dates()
        .await
        .unwrap()
        .expect("Dates missing");
    assert_eq!(range.start.format("%Y-%m-%d").to_string(), "2018-01-18");
    assert_eq!(range.end.format("%Y-%m-%d").to_string(), "2018-02-14");
}

#[tokio::test]
async fn test_cycle_label_without_dates() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    let client = create_client(&server);

    assert_eq!(client.current_cycle_effective_dates().await.unwrap(), None);
}

#[tokio::test]
async fn test_fetch_page_drops_rows_without_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(html(results_page(
            &[
                row("ANC", "A", "IAP", "00001IL7R"),
                row("ANC", "A", "", "DIVIDER"),
            ],
            0,
        )))
        .mount(&server)
        .await;
    let client = create_client(&server);

    let page = client
        .fetch_page(&format!("{}{}?ident=PANC", server.uri(), RESULTS_PATH))
        .await
        .expect("Fetch failed");

    assert_eq!(page.outcome, PageOutcome::Results);
    assert_eq!(page.records.len(), 1);
    let record = &page.records[0];
    assert_eq!(record.flag_meaning, FlagMeaning::Added);
    assert_eq!(record.procedure.name, "00001IL7R");
    assert_eq!(
        record.compare.url.as_deref(),
        Some("https://aeronav.faa.gov/d-tpp/1801/compare_pdf/00001IL7R_CMP.PDF")
    );
    assert!(record.effective_start_date.is_some());
}

#[tokio::test]
async fn test_list_one_fetches_exactly_reported_pages() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("ident", "PANC"))
        .and(query_param("cycle", "1801"))
        .and(query_param("sort", "type"))
        .and(query_param("dir", "asc"))
        .and(QueryParamMissing("page"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "P1")], 3)))
        .expect(1)
        .mount(&server)
        .await;

    for page in ["2", "3"] {
        Mock::given(method("GET"))
            .and(path(RESULTS_PATH))
            .and(query_param("page", page))
            .respond_with(html(results_page(
                &[row("ANC", "", "IAP", &format!("P{}", page))],
                3,
            )))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "4"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "P4")], 4)))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let records = client
        .list_one("PANC", &ListOptions::new())
        .await
        .expect("Crawl failed");

    let names: Vec<&str> = records.iter().map(|r| r.procedure.name.as_str()).collect();
    assert_eq!(names, vec!["P1", "P2", "P3"]);
}

#[tokio::test]
async fn test_shrinking_page_count_is_adopted() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(QueryParamMissing("page"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "P1")], 4)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "2"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "P2")], 2)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "3"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "P3")], 4)))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let records = client.list_one("PANC", &ListOptions::new()).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_page_without_table_does_not_end_walk() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(QueryParamMissing("page"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "P1")], 3)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "2"))
        .respond_with(html(
            "<html><body><p>Temporarily unavailable</p></body></html>".to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "3"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "P3")], 3)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "4"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "P4")], 4)))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let records = client.list_one("PANC", &ListOptions::new()).await.unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.procedure.name.as_str()).collect();
    assert_eq!(names, vec!["P1", "P3"]);
}

#[tokio::test]
async fn test_results_table_kept_despite_hidden_no_results_block() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "KEPT")], 0).replace(
            "<body>",
            r#"<body><div class="alert" style="display:none">No results found.</div>"#,
        )))
        .mount(&server)
        .await;
    let client = create_client(&server);

    let page = client
        .fetch_page(&format!("{}{}?ident=PANC", server.uri(), RESULTS_PATH))
        .await
        .expect("Fetch failed");

    assert_eq!(page.outcome, PageOutcome::Results);
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].procedure.name, "KEPT");
}

#[tokio::test]
async fn test_empty_flags_run_single_unfiltered_pass() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(QueryParamMissing("filterAdded"))
        .and(QueryParamMissing("filterChanged"))
        .and(QueryParamMissing("filterDeleted"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "ALL")], 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let records = client.list_one("PANC", &ListOptions::new()).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_filters_concatenate_without_dedup() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    for param in ["filterAdded", "filterChanged"] {
        Mock::given(method("GET"))
            .and(path(RESULTS_PATH))
            .and(query_param(param, "1"))
            .respond_with(html(results_page(&[row("ANC", "C", "IAP", "SAME")], 1)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = create_client(&server);
    let records = client
        .list_one("PANC", &ListOptions::from_flags(["A", "C"]))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0], records[1]);
}

#[tokio::test]
async fn test_no_results_ends_filter_without_more_pages() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("filterAdded", "1"))
        .and(QueryParamMissing("page"))
        .respond_with(html(no_results_page()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("filterAdded", "1"))
        .and(query_param("page", "2"))
        .respond_with(html(no_results_page()))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("filterDeleted", "1"))
        .respond_with(html(results_page(&[row("ANC", "D", "IAP", "GONE")], 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let records = client
        .list_one("PANC", &ListOptions::from_flags(["A", "D"]))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].flag_meaning, FlagMeaning::Deleted);
}

#[tokio::test]
async fn test_missing_table_yields_empty_result() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(html("<html><body><p>Service notice</p></body></html>".to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let records = client.list_one("PANC", &ListOptions::new()).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_missing_cycle_omits_cycle_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(html(landing_page("")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(QueryParamMissing("cycle"))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "LATEST")], 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let records = client.list_one("PANC", &ListOptions::new()).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_landing_page_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let result = client.list_one("PANC", &ListOptions::new()).await;
    assert!(matches!(result, Err(TppError::Status { .. })));
}

#[tokio::test]
async fn test_list_single_code_returns_one_list() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(html(results_page(&[row("ANC", "", "IAP", "ONLY")], 0)))
        .mount(&server)
        .await;

    let client = create_client(&server);
    match client.list("PANC", &ListOptions::new()).await.unwrap() {
        Listing::One(records) => assert_eq!(records.len(), 1),
        other => panic!("expected a single listing, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_preserves_input_order() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("ident", "AAA"))
        .respond_with(
            html(results_page(&[row("AAA", "", "IAP", "SLOW")], 0))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("ident", "BBB"))
        .respond_with(html(results_page(
            &[row("BBB", "", "IAP", "FAST1"), row("BBB", "", "APD", "FAST2")],
            0,
        )))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let per_airport = match client.list(["AAA", "BBB"], &ListOptions::new()).await {
        Ok(Listing::Many(lists)) => lists,
        other => panic!("expected a batch listing, got {:?}", other),
    };

    assert_eq!(per_airport.len(), 2);
    assert_eq!(per_airport[0].len(), 1);
    assert_eq!(per_airport[0][0].ident, "AAA");
    assert_eq!(per_airport[1].len(), 2);
    assert_eq!(per_airport[1][0].ident, "BBB");
}

#[tokio::test]
async fn test_batch_fails_when_any_airport_fails() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("ident", "AAA"))
        .respond_with(html(results_page(&[row("AAA", "", "IAP", "OK")], 0)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("ident", "BBB"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let result = client.list(["AAA", "BBB"], &ListOptions::new()).await;
    assert!(matches!(result, Err(TppError::Status { .. })));
}

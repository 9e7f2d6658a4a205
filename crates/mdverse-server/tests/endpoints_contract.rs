// SPDX-License-Identifier: Apache-2.0

mod support;

use serde_json::Value;
use support::{send_raw, start_server};

fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

#[tokio::test]
async fn index_lists_repositories_and_both_charts() {
    let server = start_server().await;
    let (status, head, body) = send_raw(server.addr, "/", &[]).await;
    assert_eq!(status, 200);
    assert!(head.contains("text/html"));
    assert!(body.contains("Number of files per year per data repository"));
    assert!(body.contains("Number of datasets per year per data repository"));
    assert!(body.contains("<td>zenodo</td>"));
    assert!(body.contains("<svg"));
    assert!(body.contains("/static/wordcloud.svg"));
}

#[tokio::test]
async fn index_regenerates_a_missing_wordcloud() {
    let server = start_server().await;
    let target = server.dir.path().join("static").join("wordcloud.svg");
    assert!(!target.exists());

    let (status, _, _) = send_raw(server.addr, "/", &[]).await;
    assert_eq!(status, 200);
    assert!(target.is_file());

    std::fs::remove_file(&target).expect("remove word cloud");
    let (status, _, body) = send_raw(server.addr, "/", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("/static/wordcloud.svg"));
    assert!(target.is_file());

    let (status, head, body) = send_raw(server.addr, "/static/wordcloud.svg", &[]).await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: image/svg+xml"));
    assert!(body.contains("membrane"));
}

#[tokio::test]
async fn healthz_reports_ok() {
    let server = start_server().await;
    let (status, _, body) = send_raw(server.addr, "/healthz", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn healthz_reports_draining_once_shutdown_starts() {
    let server = start_server().await;
    server
        .state
        .accepting_requests
        .store(false, std::sync::atomic::Ordering::Relaxed);
    let (status, _, body) = send_raw(server.addr, "/healthz", &[]).await;
    assert_eq!(status, 503);
    assert_eq!(body, "draining");
}

#[tokio::test]
async fn grid_pages_point_at_their_data_endpoints() {
    let server = start_server().await;
    for (page, ajax) in [
        ("/datasets", "/datatables/datasets"),
        ("/gro_files", "/datatables/gro_files"),
        ("/mdp_files", "/datatables/mdp_files"),
        ("/xtc_files", "/datatables/xtc_files"),
    ] {
        let (status, _, body) = send_raw(server.addr, page, &[]).await;
        assert_eq!(status, 200, "{page}");
        assert!(body.contains(ajax), "{page}");
        assert!(body.contains("serverSide: true"), "{page}");
    }
}

#[tokio::test]
async fn datasets_grid_sorts_pages_and_echoes_draw() {
    let server = start_server().await;
    let path = "/datatables/datasets?draw=7&start=0&length=2\
&order%5B0%5D%5Bcolumn%5D=0&order%5B0%5D%5Bdir%5D=desc\
&columns%5B0%5D%5Bdata%5D=view_number";
    let (status, head, body) = send_raw(server.addr, path, &[]).await;
    assert_eq!(status, 200);
    assert!(head.contains("application/json"));
    let value = json(&body);
    assert_eq!(value["draw"], 7);
    assert_eq!(value["recordsTotal"], 4);
    assert_eq!(value["recordsFiltered"], 4);
    let ids = value["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|row| row["dataset_id"].as_i64().expect("id"))
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn datasets_grid_search_narrows_filtered_count_only() {
    let server = start_server().await;
    let path = "/datatables/datasets?draw=1&search%5Bvalue%5D=zenodo";
    let (status, _, body) = send_raw(server.addr, path, &[]).await;
    assert_eq!(status, 200);
    let value = json(&body);
    assert_eq!(value["recordsTotal"], 4);
    assert_eq!(value["recordsFiltered"], 2);
    assert_eq!(value["data"].as_array().expect("data").len(), 2);
}

#[tokio::test]
async fn parameter_grid_rows_carry_the_column_keys_the_page_requests() {
    let server = start_server().await;
    let (status, _, body) = send_raw(server.addr, "/datatables/mdp_files?draw=1", &[]).await;
    assert_eq!(status, 200);
    let value = json(&body);
    assert_eq!(value["recordsTotal"], 1);
    let row = &value["data"][0];
    assert_eq!(row["thermostat_name"], "V-rescale");
    assert_eq!(row["barostat_name"], "Parrinello-Rahman");
    assert_eq!(row["integrator_name"], "md");
    assert_eq!(row["file_name"], "md.mdp");
    assert_eq!(row["dataset_origin"], "zenodo");
}

#[tokio::test]
async fn topology_and_trajectory_grids_count_detail_rows() {
    let server = start_server().await;
    let (_, _, body) = send_raw(server.addr, "/datatables/gro_files?draw=2", &[]).await;
    let value = json(&body);
    assert_eq!(value["draw"], 2);
    assert_eq!(value["recordsTotal"], 2);
    assert_eq!(value["data"][0]["atom_number"], 600);

    let (_, _, body) = send_raw(server.addr, "/datatables/xtc_files", &[]).await;
    let value = json(&body);
    assert!(value["draw"].is_null());
    assert_eq!(value["recordsTotal"], 1);
    assert_eq!(value["data"][0]["frame_number"], 1001);
}

#[tokio::test]
async fn all_parameter_files_is_a_plain_array() {
    let server = start_server().await;
    let (status, _, body) = send_raw(server.addr, "/all_mdp_files_data", &[]).await;
    assert_eq!(status, 200);
    let value = json(&body);
    let rows = value.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["nsteps"], 500000);
}

#[tokio::test]
async fn invalid_grid_parameters_return_the_error_envelope() {
    let server = start_server().await;
    let (status, head, body) = send_raw(
        server.addr,
        "/datatables/datasets?length=abc",
        &[("x-request-id", "req-contract-1")],
    )
    .await;
    assert_eq!(status, 400);
    assert!(head.contains("x-request-id: req-contract-1"));
    let value = json(&body);
    assert_eq!(value["error"]["code"], "InvalidQueryParameter");
    assert_eq!(value["error"]["request_id"], "req-contract-1");

    let (status, _, body) = send_raw(
        server.addr,
        "/datatables/datasets?order%5B0%5D%5Bcolumn%5D=0&columns%5B0%5D%5Bdata%5D=password",
        &[],
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["code"], "InvalidQueryParameter");
}

#[tokio::test]
async fn oversized_page_is_rejected() {
    let server = start_server().await;
    let (status, _, body) =
        send_raw(server.addr, "/datatables/gro_files?length=100000", &[]).await;
    assert_eq!(status, 400);
    assert_eq!(json(&body)["error"]["code"], "InvalidQueryParameter");
}

#[tokio::test]
async fn generated_request_ids_are_returned() {
    let server = start_server().await;
    let (_, head, _) = send_raw(server.addr, "/healthz", &[]).await;
    assert!(head.contains("x-request-id: req-"));
}

#[tokio::test]
async fn dataset_pages_render_and_missing_ids_are_404() {
    let server = start_server().await;
    let (status, _, body) = send_raw(server.addr, "/datasets/1", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("Lipid bilayer membrane simulation"));
    assert!(body.contains("Doe A, Smith J"));
    assert!(body.contains("/datasets/1/files"));

    let (status, _, body) = send_raw(server.addr, "/datasets/999", &[]).await;
    assert_eq!(status, 404);
    assert!(body.contains("No dataset with id 999."));

    let (status, _, _) = send_raw(server.addr, "/datasets/abc", &[]).await;
    assert_eq!(status, 404);

    let (status, _, _) = send_raw(server.addr, "/datasets/999/files", &[]).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn dataset_file_fragments_swap_into_the_files_page() {
    let server = start_server().await;
    let (status, _, body) = send_raw(server.addr, "/datasets/1/files", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("hx-get=\"/datasets/1/files/top_files\""));
    assert!(body.contains("id=\"file-table\""));

    let (status, _, body) = send_raw(server.addr, "/datasets/1/files/all", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("membrane.gro"));
    assert!(body.contains("traj.xtc"));
    assert!(!body.contains("<html"));

    let (_, _, body) = send_raw(server.addr, "/datasets/1/files/top_files", &[]).await;
    assert!(body.contains("membrane.gro"));
    assert!(!body.contains("protein.gro"));

    let (_, _, body) = send_raw(server.addr, "/datasets/1/files/param_files", &[]).await;
    assert!(body.contains("V-rescale"));

    let (_, _, body) = send_raw(server.addr, "/datasets/1/files/traj_files", &[]).await;
    assert!(body.contains("<td>1001</td>"));
}

#[tokio::test]
async fn file_types_page_offers_download_buttons() {
    let server = start_server().await;
    let (status, _, body) = send_raw(server.addr, "/file_types", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("hx-get=\"/file_types/gro/download_info\""));
    assert!(body.contains("<a href=\"/gro_files\">gro</a>"));
    assert!(!body.contains("href=\"/zip_files\""));

    let (status, _, body) = send_raw(server.addr, "/file_types/gro/download_info", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("/file_types/gro/download_list/"));
    assert!(body.contains("Download the list of 2 .gro files"));
}

#[tokio::test]
async fn download_list_is_a_tsv_attachment() {
    let server = start_server().await;
    let (status, head, body) =
        send_raw(server.addr, "/file_types/gro/download_list/", &[]).await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: text/tab-separated-values"));
    assert!(head.contains("content-disposition: attachment; filename=\"mdverse_gro.tsv\""));
    let lines = body.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("dataset_id\tdataset_origin\tfile_name"));
    // Archive members are listed with the archive URL.
    assert!(lines
        .iter()
        .any(|l| l.starts_with("1002\tzenodo\tprotein.gro\t800\tTrue\thttps://zenodo.org/record/1002/files/archive.zip")));
}

#[tokio::test]
async fn unknown_file_types_are_404() {
    let server = start_server().await;
    for path in [
        "/file_types/pdb/download_info",
        "/file_types/pdb/download_list/",
    ] {
        let (status, _, body) = send_raw(server.addr, path, &[]).await;
        assert_eq!(status, 404, "{path}");
        assert_eq!(json(&body)["error"]["code"], "FileTypeNotFound", "{path}");
    }
}

#[tokio::test]
async fn static_files_are_served_without_traversal() {
    let server = start_server().await;
    let (status, head, body) = send_raw(server.addr, "/static/style.css", &[]).await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: text/css"));
    assert!(body.contains("margin"));

    for path in [
        "/static/..%2Fdatabase.db",
        "/static/%2E%2E%2Fdatabase.db",
        "/static/../database.db",
    ] {
        let (status, _, body) = send_raw(server.addr, path, &[]).await;
        assert_ne!(status, 200, "{path}");
        assert!(!body.contains("SQLite format"), "{path}");
    }
    let (status, _, _) = send_raw(server.addr, "/static/missing.png", &[]).await;
    assert_eq!(status, 404);
}

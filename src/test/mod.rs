use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use serde_json::{json, Value};

use crate::{
    app_configure,
    configs::connect_memory_database,
    modules::{
        file_upload::{
            model::{NewFile, UploadConfig},
            repository::FileRepository,
            repository_sqlite::FileRepositorySqlite,
            service::FileUploadService,
        },
        song::{repository_sqlite::SongRepositorySqlite, service::SongService},
    },
};

const BOUNDARY: &str = "tuneful-boundary";

struct Harness {
    pool: sqlx::SqlitePool,
    files: FileRepositorySqlite,
    upload_dir: tempfile::TempDir,
    song_service: SongService<SongRepositorySqlite, FileRepositorySqlite>,
    file_service: FileUploadService<FileRepositorySqlite>,
}

impl Harness {
    async fn new() -> Self {
        Self::with_max_file_size(UploadConfig::default().max_file_size).await
    }

    async fn with_max_file_size(max_file_size: usize) -> Self {
        let pool = connect_memory_database().await.unwrap();
        let upload_dir = tempfile::tempdir().unwrap();
        let files = FileRepositorySqlite::new(pool.clone());
        let config = UploadConfig {
            max_file_size,
            upload_dir: upload_dir.path().to_path_buf(),
            ..UploadConfig::default()
        };

        let song_service = SongService::with_dependencies(
            Arc::new(SongRepositorySqlite::new(pool.clone())),
            Arc::new(files.clone()),
        );
        let file_service = FileUploadService::new(Arc::new(files.clone()), config);

        Harness { pool, files, upload_dir, song_service, file_service }
    }

    async fn add_file(&self, name: &str) -> i64 {
        self.files.create(&NewFile { name: name.to_string() }, &self.pool).await.unwrap().id
    }

    async fn add_song(&self, file_id: i64) -> i64 {
        sqlx::query_scalar("INSERT INTO songs (file_id) VALUES (?) RETURNING id")
            .bind(file_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

macro_rules! test_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.song_service.clone()))
                .app_data(web::Data::new($harness.file_service.clone()))
                .configure(app_configure),
        )
        .await
    };
}

fn json_request(req: test::TestRequest, body: Value) -> test::TestRequest {
    req.uri("/api/songs").insert_header((header::ACCEPT, "application/json")).set_json(body)
}

fn multipart_body(field: &str, filename: &str, contents: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         {contents}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

fn upload_request(body: String) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/files")
        .insert_header((header::ACCEPT, "application/json"))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

fn content_type<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn health_check_responds() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "Tuneful is running");
}

#[actix_web::test]
async fn get_empty_songs() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/songs")
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "application/json");
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data, json!([]));
}

#[actix_web::test]
async fn new_song_returns_full_list() {
    let harness = Harness::new().await;
    let file_id = harness.add_file("chords.wav").await;
    let app = test_app!(harness);

    let req =
        json_request(test::TestRequest::post(), json!({ "file": { "id": file_id } })).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(content_type(&resp), "application/json");
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data, json!([{ "id": 1, "file": { "id": file_id, "name": "chords.wav" } }]));

    let req =
        json_request(test::TestRequest::post(), json!({ "file": { "id": file_id } })).to_request();
    let data: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(data.as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn invalid_song_reports_missing_properties() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = json_request(test::TestRequest::post(), json!({})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(content_type(&resp), "application/json");
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "'file' is a required property");

    let req = json_request(test::TestRequest::post(), json!({ "file": {} })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "'id' is a required property");
}

#[actix_web::test]
async fn invalid_song_reports_bad_values() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req =
        json_request(test::TestRequest::post(), json!({ "file": { "id": "one" } })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "\"one\" is not of type 'integer'");

    let req =
        json_request(test::TestRequest::post(), json!({ "file": { "id": 2.5 } })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "2.5 is not of type 'integer'");
}

#[actix_web::test]
async fn ids_matching_no_song_are_not_found() {
    let harness = Harness::new().await;
    let file_id = harness.add_file("chords.wav").await;
    let app = test_app!(harness);

    for id in [json!(0), json!(-1), json!(9223372036854775808u64)] {
        let req = json_request(test::TestRequest::delete(), json!({ "id": id })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let data: Value = test::read_body_json(resp).await;
        assert_eq!(data["message"], format!("Could not find song with id {id}"));

        let body = json!({ "id": id, "file": { "id": file_id } });
        let req = json_request(test::TestRequest::put(), body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let data: Value = test::read_body_json(resp).await;
        assert_eq!(data["message"], format!("Could not find song with id {id}"));
    }
}

#[actix_web::test]
async fn file_ids_out_of_range_are_unknown_files() {
    let harness = Harness::new().await;
    let file_id = harness.add_file("chords.wav").await;
    let song_id = harness.add_song(file_id).await;
    let app = test_app!(harness);

    let body = json!({ "file": { "id": 9223372036854775808u64 } });
    let req = json_request(test::TestRequest::post(), body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Could not find file with id 9223372036854775808");

    let body = json!({ "id": song_id, "file": { "id": 9223372036854775808u64 } });
    let req = json_request(test::TestRequest::put(), body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(harness.count("songs").await, 1);
}

#[actix_web::test]
async fn new_song_with_unknown_file_is_rejected() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = json_request(test::TestRequest::post(), json!({ "file": { "id": 9 } })).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Could not find file with id 9");
    assert_eq!(harness.count("songs").await, 0);
}

#[actix_web::test]
async fn update_song_file() {
    let harness = Harness::new().await;
    let first = harness.add_file("chords.wav").await;
    let second = harness.add_file("blah.flac").await;
    let song_id = harness.add_song(first).await;
    let app = test_app!(harness);

    let body = json!({ "id": song_id, "file": { "id": second } });
    let req = json_request(test::TestRequest::put(), body).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "application/json");
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], format!("Song #{song_id} updated"));

    let req = test::TestRequest::get()
        .uri("/api/songs")
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    let data: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(data, json!([{ "id": song_id, "file": { "id": second, "name": "blah.flac" } }]));
}

#[actix_web::test]
async fn update_missing_song_is_not_found() {
    let harness = Harness::new().await;
    let file_id = harness.add_file("chords.wav").await;
    let app = test_app!(harness);

    let body = json!({ "id": 5, "file": { "id": file_id } });
    let req = json_request(test::TestRequest::put(), body).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Could not find song with id 5");
}

#[actix_web::test]
async fn update_song_to_unknown_file_keeps_old_reference() {
    let harness = Harness::new().await;
    let file_id = harness.add_file("chords.wav").await;
    let song_id = harness.add_song(file_id).await;
    let app = test_app!(harness);

    let body = json!({ "id": song_id, "file": { "id": 42 } });
    let req = json_request(test::TestRequest::put(), body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Could not find file with id 42");

    let stored: i64 = sqlx::query_scalar("SELECT file_id FROM songs WHERE id = ?")
        .bind(song_id)
        .fetch_one(&harness.pool)
        .await
        .unwrap();
    assert_eq!(stored, file_id);
}

#[actix_web::test]
async fn delete_song_keeps_file() {
    let harness = Harness::new().await;
    let file_id = harness.add_file("chords.wav").await;
    let song_id = harness.add_song(file_id).await;
    let app = test_app!(harness);

    let req = json_request(test::TestRequest::delete(), json!({ "id": song_id })).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], format!("Song #{song_id} deleted"));

    let req = test::TestRequest::get()
        .uri("/api/songs")
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    let data: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(data, json!([]));
    assert_eq!(harness.count("files").await, 1);
}

#[actix_web::test]
async fn delete_missing_song_is_not_found() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = json_request(test::TestRequest::delete(), json!({ "id": 3 })).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Could not find song with id 3");
}

#[actix_web::test]
async fn delete_requires_id() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = json_request(test::TestRequest::delete(), json!({})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "'id' is a required property");
}

#[actix_web::test]
async fn upload_then_fetch_file() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = upload_request(multipart_body("file", "test.txt", "File contents")).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(content_type(&resp), "application/json");
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data, json!({ "id": 1, "name": "test.txt", "path": "/uploads/test.txt" }));
    assert_eq!(harness.count("files").await, 1);

    let req = test::TestRequest::get().uri("/uploads/test.txt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "text/plain");
    assert_eq!(test::read_body(resp).await, "File contents");
}

#[actix_web::test]
async fn upload_sanitizes_filename() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = upload_request(multipart_body("file", "../../my song.txt", "la la")).to_request();
    let data: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(data["name"], "my_song.txt");
    assert!(harness.upload_dir.path().join("my_song.txt").exists());
}

#[actix_web::test]
async fn upload_without_file_field() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req =
        upload_request(multipart_body("attachment", "test.txt", "File contents")).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Could not find file data");
    assert_eq!(harness.count("files").await, 0);
}

#[actix_web::test]
async fn file_part_without_filename_is_not_file_data() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"\r\n\r\n\
         File contents\r\n\
         --{BOUNDARY}--\r\n"
    );
    let resp = test::call_service(&app, upload_request(body).to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Could not find file data");
    assert_eq!(harness.count("files").await, 0);
}

#[actix_web::test]
async fn oversized_upload_is_rejected() {
    let harness = Harness::with_max_file_size(8).await;
    let app = test_app!(harness);

    let req = upload_request(multipart_body("file", "big.txt", "0123456789")).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "File size exceeds maximum allowed size of 8 bytes");
    assert_eq!(harness.count("files").await, 0);
    assert!(!harness.upload_dir.path().join("big.txt").exists());

    let req = upload_request(multipart_body("file", "small.txt", "01234567")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn get_uploaded_file_written_directly() {
    let harness = Harness::new().await;
    std::fs::write(harness.upload_dir.path().join("test.txt"), b"File contents").unwrap();
    let app = test_app!(harness);

    let req = test::TestRequest::get().uri("/uploads/test.txt").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "text/plain");
    assert_eq!(test::read_body(resp).await, "File contents");
}

#[actix_web::test]
async fn get_missing_upload_is_not_found() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = test::TestRequest::get().uri("/uploads/nothing.mp3").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Could not find file nothing.mp3");
}

#[actix_web::test]
async fn refuses_clients_that_do_not_accept_json() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/songs")
        .insert_header((header::ACCEPT, "text/html"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Request must accept application/json data");
}

#[actix_web::test]
async fn refuses_wrong_content_types() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/songs")
        .insert_header((header::ACCEPT, "application/json"))
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"file":{"id":1}}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Request must contain application/json data");

    let req = test::TestRequest::post()
        .uri("/api/files")
        .insert_header((header::ACCEPT, "application/json"))
        .set_json(json!({ "file": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let data: Value = test::read_body_json(resp).await;
    assert_eq!(data["message"], "Request must contain multipart/form-data data");
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let harness = Harness::new().await;
    let app = test_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/songs")
        .insert_header((header::ACCEPT, "application/json"))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp), "application/json");
    let data: Value = test::read_body_json(resp).await;
    assert!(data["message"].as_str().is_some_and(|m| m.starts_with("Json deserialize error")));
    assert_eq!(harness.count("songs").await, 0);
}

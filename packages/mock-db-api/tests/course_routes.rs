//! Course listing and detail routes.

mod common;

use serde_json::Value;

use common::{get, seeded_router};

fn ids(body: &Value) -> Vec<String> {
    body["data"]["courses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_list_courses_with_teacher_names() {
    let router = seeded_router();
    let (status, body) = get(&router, "/api/courses");
    assert_eq!(status, 200);
    assert_eq!(body["data"]["total"], 6);
    assert_eq!(ids(&body), vec!["1", "2", "3", "4", "5", "6"]);

    let first = &body["data"]["courses"][0];
    assert_eq!(first["teacher"], "Ivy Marsh");
    assert_eq!(first["teacherId"], 1);
    assert_eq!(body["data"]["courses"][5]["teacher"], "Lena Vogt");
}

#[test]
fn test_list_courses_paginates() {
    let router = seeded_router();
    let (_, body) = get(&router, "/api/courses?page=2&limit=4");
    assert_eq!(ids(&body), vec!["5", "6"]);
    assert_eq!(body["data"]["total"], 6);

    let (_, body) = get(&router, "/api/courses?page=1&limit=2");
    assert_eq!(ids(&body), vec!["1", "2"]);

    let (_, body) = get(&router, "/api/courses?page=4&limit=2");
    assert!(ids(&body).is_empty());
}

#[test]
fn test_course_detail_joins_relations() {
    let router = seeded_router();
    let (status, body) = get(&router, "/api/course?id=4");
    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["name"], "Rust in Practice");
    assert_eq!(data["teacher"], "Kenji Mori");
    assert_eq!(data["typeName"], "Rust");
    assert_eq!(data["sales"]["id"], "4");
    assert_eq!(data["sales"]["price"], 600);
    assert_eq!(data["process"]["chapters"].as_array().unwrap().len(), 2);
}

#[test]
fn test_course_detail_not_found() {
    let router = seeded_router();
    let (status, body) = get(&router, "/api/course?id=42");
    assert_eq!(status, 400);
    assert_eq!(body["msg"], "can't find course by id 42 ");
    assert_eq!(body["code"], 400);
}

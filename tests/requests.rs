//! End-to-end request flows through `handle_request`.

use deckdraw_server::{configure, handle_request};

fn post(path: &str, body: &str) -> String {
    handle_request("POST", path, "", body)
}

fn get(path: &str) -> String {
    handle_request("GET", path, "", "")
}

fn state() -> serde_json::Value {
    serde_json::from_str(&get("/api/deck/state")).expect("state is JSON")
}

fn load(category: &str, name: &str, csv: &str) -> String {
    let encoded: String = csv
        .chars()
        .map(|c| match c {
            '\n' => "%0A".to_string(),
            ',' => "%2C".to_string(),
            '&' => "%26".to_string(),
            ' ' => "+".to_string(),
            c => c.to_string(),
        })
        .collect();
    post(
        "/api/deck/load",
        &format!("category={category}&name={name}&csv={encoded}"),
    )
}

#[test]
fn three_card_deck_draws_a_permutation_then_stops() {
    configure(r#"{"seed": 2024}"#);
    load("characters", "heroes.csv", "name,class\nA,x\nB,y\nC,z\n");

    for _ in 0..3 {
        post("/api/deck/draw", "");
    }
    let snap = state();
    let mut indices: Vec<u64> = snap["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["table_index"].as_u64().unwrap())
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(snap["remaining"], 0);

    let html = post("/api/deck/draw", "");
    assert!(html.contains(" disabled>Draw</button>"));
    assert_eq!(state()["history"].as_array().unwrap().len(), 3);

    post("/api/deck/reshuffle", "");
    assert_eq!(state()["remaining"], 3);
    assert_eq!(state()["history"].as_array().unwrap().len(), 3);
}

#[test]
fn marker_flow_caps_and_clears() {
    configure(r#"{"seed": 9}"#);
    load("quests", "quests.csv", "title\nRescue the otter\n");
    post("/api/deck/select", "category=quests");
    post("/api/deck/draw", "");

    let id = state()["history"][0]["id"].as_str().unwrap().to_string();
    for _ in 0..11 {
        post("/api/deck/card", &format!("id={id}&action=mark"));
    }
    assert_eq!(state()["history"][0]["marker_count"], 10);

    post("/api/deck/card", &format!("id={id}&action=unmark"));
    assert_eq!(state()["history"][0]["marker_count"], 0);

    let html = post("/api/deck/card", &format!("id={id}&action=dismiss"));
    assert!(html.contains("No cards drawn yet"));
}

#[test]
fn bulk_upload_then_draw_from_default_slot() {
    configure(r#"{"seed": 77}"#);
    let body = serde_json::json!({
        "files": [
            { "name": "monsters.csv", "text": "name\nOrc\n" },
            { "name": "items_v2.csv", "text": "name\nSword\nShield\n" },
            { "name": "random.csv", "text": "place\nCave\n" },
        ]
    })
    .to_string();
    let html = post("/api/deck/bulk", &body);
    assert!(html.contains("(default)"));

    let sizes = state()["table_sizes"].clone();
    assert_eq!(sizes[0], serde_json::json!(["characters", 1]));
    assert_eq!(sizes[1], serde_json::json!(["items", 2]));
    assert_eq!(sizes[2], serde_json::json!(["locations", 1]));
    assert_eq!(sizes[3], serde_json::json!(["quests", 0]));

    let html = post("/api/deck/draw", "");
    assert!(html.contains("Orc"));
    assert!(html.contains("Characters #1"));
}

#[test]
fn repeats_mode_keeps_drawing() {
    configure(r#"{"seed": 5, "allow_repeats": true}"#);
    load("items", "i.csv", "name\nSword\n");
    post("/api/deck/select", "category=items");
    for _ in 0..5 {
        post("/api/deck/draw", "");
    }
    assert_eq!(state()["history"].as_array().unwrap().len(), 5);

    post("/api/deck/repeats", "allow=false");
    assert_eq!(state()["allow_repeats"], false);
}

#[test]
fn reload_clears_history() {
    configure(r#"{"seed": 1}"#);
    load("items", "i.csv", "name\nSword\nAxe\n");
    post("/api/deck/select", "category=item");
    post("/api/deck/draw", "");
    load("locations", "l.csv", "name\nCave\n");
    let snap = state();
    assert!(snap["history"].as_array().unwrap().is_empty());
    assert_eq!(snap["selected"], "items");
    assert_eq!(snap["remaining"], 2);
}

//! Integration tests for the `lw` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory holding a small campaign file.
fn test_campaign() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign.json");
    fs::write(
        &path,
        r#"{
    "config": {
        "loot": { "loot_table": "goblin", "draw_formula": "1" },
        "trade": { "price_modifier": 1.0, "sell_modifier": 0.5 }
    },
    "tables": {
        "tables": [
            {
                "id": "goblin",
                "name": "Goblin Pockets",
                "formula": "1d1",
                "entries": [{ "type": "text", "text": "Torch {1d1[gp]}" }]
            },
            {
                "id": "broken",
                "name": "Broken",
                "entries": [{ "type": "text", "text": "Nothing" }]
            }
        ]
    },
    "items": [{ "name": "Torch", "kind": "loot", "price": 0.01 }],
    "actors": [
        { "name": "Goblin", "kind": "npc" },
        {
            "name": "Bram",
            "kind": "merchant",
            "items": [
                { "name": "Lantern", "kind": "equipment", "price": 5 },
                { "name": "Rope", "kind": "equipment", "price": 1, "quantity": 5 }
            ]
        },
        { "name": "Ayla", "kind": "character", "currency": { "gp": 10 } },
        { "name": "Bo", "kind": "character" },
        { "name": "Chest", "kind": "loot", "currency": { "gp": 7 } }
    ]
}
"#,
    )
    .unwrap();
    (dir, path)
}

fn lw() -> Command {
    Command::cargo_bin("lw").unwrap()
}

fn actor<'a>(campaign: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    campaign["actors"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == name)
        .unwrap()
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_prints_draws() {
    let (_dir, path) = test_campaign();
    lw().args(["roll", "goblin", "-n", "2", "-s", "7", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Torch {1d1[gp]}").and(predicate::str::contains("2 results")),
        );
}

#[test]
fn roll_unknown_table_fails() {
    let (_dir, path) = test_campaign();
    lw().args(["roll", "dragon", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("table not found"));
}

#[test]
fn roll_table_without_formula_reports_error() {
    let (_dir, path) = test_campaign();
    lw().args(["roll", "broken", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing drawn"))
        .stderr(predicate::str::contains("has no roll formula"));
}

#[test]
fn missing_campaign_fails() {
    let dir = TempDir::new().unwrap();
    lw().args(["roll", "goblin", "-c"])
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// populate
// ---------------------------------------------------------------------------

#[test]
fn populate_reports_items_and_coins() {
    let (_dir, path) = test_campaign();
    lw().args(["populate", "goblin", "-s", "1", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Goblin: 1 draw(s) from \"Goblin Pockets\"")
                .and(predicate::str::contains("+1 Torch (new)"))
                .and(predicate::str::contains("coins: +1gp")),
        );
}

#[test]
fn populate_writes_output() {
    let (dir, path) = test_campaign();
    let out = dir.path().join("after.json");
    lw().args(["populate", "Goblin", "-c"])
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved campaign"));

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let goblin = actor(&saved, "Goblin");
    assert_eq!(goblin["items"][0]["name"], "Torch");
    assert_eq!(goblin["currency"]["gp"], 1.0);
    assert!(
        saved["catalogs"]["world"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .any(|i| i["name"] == "Torch")
    );
}

#[test]
fn populate_json_output() {
    let (_dir, path) = test_campaign();
    lw().args(["populate", "goblin", "--json", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"actor_name\": \"Goblin\""));
}

#[test]
fn populate_unknown_actor_fails() {
    let (_dir, path) = test_campaign();
    lw().args(["populate", "dragon", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("actor not found"));
}

// ---------------------------------------------------------------------------
// currency / exchange
// ---------------------------------------------------------------------------

#[test]
fn currency_rolls_formula() {
    lw().args(["currency", "1d1[gp], 3[sp]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1gp 3sp").and(predicate::str::contains("worth 1.3 gp")));
}

#[test]
fn currency_skips_bad_clause() {
    lw().args(["currency", "2d6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0gp"))
        .stderr(predicate::str::contains("not in the form dice[denomination]"));
}

#[test]
fn exchange_copper_to_platinum() {
    lw().args(["exchange", "1000cp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000cp = 1pp"));
}

#[test]
fn exchange_only_gold() {
    lw().args(["exchange", "1000cp", "--only", "gp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000cp = 10gp"));
}

#[test]
fn exchange_rejects_bad_amount() {
    lw().args(["exchange", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// trade
// ---------------------------------------------------------------------------

#[test]
fn trade_buy_settles_coins() {
    let (dir, path) = test_campaign();
    let out = dir.path().join("after.json");
    lw().args(["trade", "buy", "Bram", "Ayla", "Lantern", "-c"])
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("buy: 1x Lantern for 5 gp")
                .and(predicate::str::contains("Ayla: 5gp")),
        );

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(actor(&saved, "Ayla")["items"][0]["name"], "Lantern");
    assert_eq!(actor(&saved, "Bram")["currency"]["gp"], 5.0);
}

#[test]
fn trade_exports_log() {
    let (dir, path) = test_campaign();
    let log = dir.path().join("trades.md");
    lw().args(["trade", "buy", "Bram", "Ayla", "Lantern", "-c"])
        .arg(&path)
        .arg("--log")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote trade log"));

    let markdown = fs::read_to_string(&log).unwrap();
    assert!(markdown.starts_with("# Trade Log"));
    assert!(markdown.contains("**buy**: Bram -> Ayla"));
    assert!(markdown.contains("- 1x Lantern"));
    assert!(markdown.contains("*Price*: 5 gp"));
}

#[test]
fn trade_without_funds_fails() {
    let (_dir, path) = test_campaign();
    lw().args(["trade", "buy", "Bram", "Bo", "Rope:2", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Bo cannot afford 2 gp")
                .and(predicate::str::contains("insufficient funds")),
        );
}

#[test]
fn trade_give_is_free() {
    let (_dir, path) = test_campaign();
    lw().args(["trade", "give", "Bram", "Bo", "Rope:5", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("give: 5x Rope").and(predicate::str::contains("Bo: 0gp")));
}

#[test]
fn trade_rejects_unknown_kind_and_item() {
    let (_dir, path) = test_campaign();
    lw().args(["trade", "steal", "Bram", "Bo", "Rope", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown trade kind"));

    lw().args(["trade", "buy", "Bram", "Ayla", "Sword", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bram has no \"Sword\""));
}

// ---------------------------------------------------------------------------
// split
// ---------------------------------------------------------------------------

#[test]
fn split_shares_coins() {
    let (_dir, path) = test_campaign();
    lw().args(["split", "Chest", "Ayla", "Bo", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("3gp each to 2 observer(s)")
                .and(predicate::str::contains("left on Chest: 1gp")),
        );
}

#[test]
fn split_take_moves_everything() {
    let (dir, path) = test_campaign();
    let out = dir.path().join("after.json");
    lw().args(["split", "Chest", "Bo", "--take", "-c"])
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("7gp from Chest"));

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(actor(&saved, "Bo")["currency"]["gp"], 7.0);
    assert_eq!(actor(&saved, "Chest")["currency"]["gp"], 0.0);
}

#[test]
fn split_take_exports_log() {
    let (dir, path) = test_campaign();
    let log = dir.path().join("coins.md");
    lw().args(["split", "Chest", "Bo", "--take", "-c"])
        .arg(&path)
        .arg("--log")
        .arg(&log)
        .assert()
        .success();

    let markdown = fs::read_to_string(&log).unwrap();
    assert!(markdown.contains("**Coins**: Bo looted 7gp from Chest"));
}

#[test]
fn split_take_needs_one_looter() {
    let (_dir, path) = test_campaign();
    lw().args(["split", "Chest", "Ayla", "Bo", "--take", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one looter"));
}

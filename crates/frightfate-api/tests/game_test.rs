//! Integration tests for play: scenarios, answers, elimination and results.

mod common;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use frightfate_core::oracle::OracleError;
use frightfate_test_support::ScriptedOracle;

/// Scores answers that mention the cellar door as fatal and everything else
/// as careful. Scenario and results calls fail and fall back.
fn scoring_oracle() -> ScriptedOracle {
    ScriptedOracle::responding(|request, _| {
        let analysis_call = request.params.max_output_tokens == 512;
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if !analysis_call {
            return Err(OracleError::Unavailable("offline".into()));
        }
        if prompt.contains("open the cellar door and go down") {
            Ok(r#"{"survival_score": 12, "analysis": "A fatal mistake.",
                   "instant_death": true, "death_reason": "Dragged into the dark"}"#
                .to_owned())
        } else {
            Ok(r#"```json
{"survival_score": 82, "analysis": "Careful and deliberate."}
```"#
                .to_owned())
        }
    })
}

async fn started_game(app: &Router, names: &[&str]) -> (String, Vec<String>) {
    let code = common::create_session(app, Some("haunted_house")).await;
    let mut ids = Vec::new();
    for name in names {
        ids.push(common::join(app, &code, name).await);
    }
    let (status, _) = common::post_json(
        app.clone(),
        &format!("/api/game/sessions/{code}/start"),
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (code, ids)
}

async fn answer(
    app: &Router,
    code: &str,
    player_id: &str,
    question_number: u32,
    text: &str,
) -> (StatusCode, serde_json::Value) {
    common::post_json(
        app.clone(),
        "/api/game/answers",
        &serde_json::json!({
            "session_code": code,
            "player_id": player_id,
            "question_number": question_number,
            "answer_text": text,
        }),
    )
    .await
}

#[tokio::test]
async fn test_full_game_eliminates_one_player_and_ranks_the_survivor() {
    let app = common::build_test_app(Arc::new(scoring_oracle()));
    let (code, ids) = started_game(&app, &["Ada", "Bo"]).await;
    let (ada, bo) = (&ids[0], &ids[1]);

    // GET /sessions/{code}/scenarios/1 falls back to the themed opener
    let (status, scenario) = common::get_json(
        app.clone(),
        &format!("/api/game/sessions/{code}/scenarios/1?player_id={ada}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scenario["question_number"], 1);
    assert_eq!(scenario["death_risk_level"], "medium");

    // POST /answers for the survivor
    let (status, receipt) = answer(
        &app,
        &code,
        ada,
        1,
        "I quietly check the hallway and keep my back to the wall",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["score"], 82);
    assert_eq!(receipt["instant_death"], false);
    assert_eq!(receipt["outcome"], "inserted");

    // POST /answers for the doomed player
    let (status, receipt) = answer(&app, &code, bo, 1, "I open the cellar door and go down").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["instant_death"], true);
    assert_eq!(receipt["classification"], "deadly");
    assert_eq!(receipt["elimination_reason"], "Dragged into the dark");
    assert_eq!(receipt["death_order"], 1);
    assert_eq!(receipt["death_narrative"]["player_name"], "Bo");

    // GET /sessions/{code}/players/{id}/elimination
    let (status, view) = common::get_json(
        app.clone(),
        &format!("/api/game/sessions/{code}/players/{bo}/elimination"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["is_eliminated"], true);
    assert_eq!(view["can_continue"], false);

    // The eliminated player can no longer play
    let (status, json) = common::get_json(
        app.clone(),
        &format!("/api/game/sessions/{code}/scenarios/2?player_id={bo}"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "player_eliminated");

    let (status, json) = answer(&app, &code, bo, 2, "I run back up the stairs").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "player_eliminated");

    // GET /sessions/{code}/results
    let (status, results) =
        common::get_json(app.clone(), &format!("/api/game/sessions/{code}/results")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["survivors"], 1);
    assert_eq!(results["eliminated"], 1);
    assert_eq!(results["total_players"], 2);
    let fates = results["results"].as_array().unwrap();
    assert_eq!(fates[0]["player_name"], "Ada");
    assert_eq!(fates[0]["rank"], 1);
    assert_eq!(fates[0]["survived"], true);
    assert_eq!(fates[1]["player_name"], "Bo");
    assert_eq!(fates[1]["rank"], 2);
    assert_eq!(fates[1]["survived"], false);

    // Results complete the session
    let (_, session) = common::get_json(app.clone(), &format!("/api/game/sessions/{code}")).await;
    assert_eq!(session["status"], "completed");
    assert_eq!(session["eliminated_players"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_resubmitting_an_answer_overwrites_it() {
    let app = common::build_offline_app();
    let (code, ids) = started_game(&app, &["Ada"]).await;

    let (status, first) = answer(&app, &code, &ids[0], 1, "I hide").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["outcome"], "inserted");

    let (status, second) = answer(
        &app,
        &code,
        &ids[0],
        1,
        "I carefully barricade the door and look for another exit",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["outcome"], "updated");
    assert_eq!(second["total_score"], second["score"]);
}

#[tokio::test]
async fn test_scenario_for_unknown_player_returns_404() {
    let app = common::build_offline_app();
    let (code, _) = started_game(&app, &["Ada"]).await;

    let (status, json) = common::get_json(
        app,
        &format!(
            "/api/game/sessions/{code}/scenarios/1?player_id={}",
            uuid::Uuid::new_v4()
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_question_zero_returns_400() {
    let app = common::build_offline_app();
    let (code, ids) = started_game(&app, &["Ada"]).await;

    let (status, _) = common::get_json(
        app,
        &format!("/api/game/sessions/{code}/scenarios/0?player_id={}", ids[0]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_get_printers() {
    assert_eq!(GatewayRequest::parse("GET_PRINTERS").unwrap(), GatewayRequest::GetPrinters);
}

#[test]
fn parses_set_settings_with_raw_payload() {
    let line = r#"SET_SETTINGS;{"Printers":["A","B"],"Interval":30}"#;
    let req = GatewayRequest::parse(line).unwrap();
    assert_eq!(req, GatewayRequest::SetSettings(r#"{"Printers":["A","B"],"Interval":30}"#.into()));
}

#[test]
fn set_settings_payload_keeps_semicolons_after_first() {
    let line = r#"SET_SETTINGS;{"Printers":["Front;Desk"],"Interval":5}"#;
    match GatewayRequest::parse(line).unwrap() {
        GatewayRequest::SetSettings(payload) => {
            let settings: Settings = serde_json::from_str(&payload).unwrap();
            assert_eq!(settings.printers, vec!["Front;Desk".to_string()]);
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[test]
fn parses_queue_length_query() {
    assert_eq!(GatewayRequest::parse("GetQueueLength").unwrap(), GatewayRequest::GetQueueLength);
}

#[test]
fn unknown_verb_is_rejected() {
    assert!(matches!(
        GatewayRequest::parse("REBOOT"),
        Err(crate::CommandError::UnknownCommand)
    ));
}

#[test]
fn request_encode_parse_round_trip() {
    let requests = vec![
        GatewayRequest::GetPrinters,
        GatewayRequest::SetSettings(r#"{"Printers":[],"Interval":60}"#.into()),
        GatewayRequest::GetQueueLength,
    ];
    for req in requests {
        assert_eq!(GatewayRequest::parse(&req.encode()).unwrap(), req);
    }
}

#[test]
fn settings_accepts_pascal_case_document() {
    let settings: Settings =
        serde_json::from_str(r#"{"Printers":["A","B"],"Interval":30}"#).unwrap();
    assert_eq!(settings.printers, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(settings.interval, 30.0);
}

#[test]
fn reply_encodings() {
    assert_eq!(
        GatewayReply::Printers(vec!["A".into(), "B".into()]).encode(),
        "A;B"
    );
    assert_eq!(GatewayReply::Printers(vec![]).encode(), "");
    assert_eq!(GatewayReply::Ok("settings applied".into()).encode(), "OK: settings applied");
    assert_eq!(GatewayReply::Error("no agent".into()).encode(), "ERROR: no agent");
    assert_eq!(GatewayReply::UnknownCommand.encode(), "ERROR:UnknownCommand");
    assert_eq!(GatewayReply::Forwarded("QUEUE_LENGTH:4".into()).encode(), "QUEUE_LENGTH:4");
}

//! Integration test for RAML 1.0 conversion

use raml_api_docs_parser::oas20::{Oas20Writer, ParameterLocation};
use raml_api_docs_parser::raml::RamlModeler;
use raml_api_docs_parser::{Oas20Generator, ParserConfig, RamlParser, RamlVersion};
use serde_json::Value;

const MUSIC_API: &str = r#"#%RAML 1.0
title: Music API
version: v1
description: Catalog of songs and playlists
baseUri: https://api.music.example/{version}
protocols: [ HTTPS ]
mediaType: application/json

types:
  Song:
    type: object
    description: A song in the catalog
    properties:
      id: integer
      title:
        type: string
        maxLength: 200
      genre?:
        enum: [rock, jazz, pop]
      released:
        type: date-only
        required: false
  Playlist:
    properties:
      name: string
      songs: Song[]

/songs:
  displayName: Songs
  get:
    displayName: List songs
    queryParameters:
      genre?:
        type: string
        description: Filter by genre
      limit:
        type: integer
        minimum: 1
        maximum: 100
        default: 20
    responses:
      200:
        description: Songs page
        headers:
          X-Total-Count:
            type: integer
        body:
          application/json:
            type: Song[]
  post:
    body:
      application/json:
        type: Song
    responses:
      201:
        description: Created
        body:
          application/json:
            type: Song
  /{songId}:
    uriParameters:
      songId:
        type: integer
        description: Song identifier
    get:
      responses:
        200:
          body:
            application/json:
              type: Song
        404:
          description: Not found
    delete:
/playlists/{playlistId}/songs:
  put:
    body:
      type: Playlist
"#;

fn convert(definition: &str) -> Value {
    let model = RamlModeler::raml10().model(definition).unwrap();
    let output = Oas20Writer::new().generate_string(&model).unwrap();
    serde_json::from_str(&output).unwrap()
}

#[test]
fn test_root_metadata() {
    let doc = convert(MUSIC_API);

    assert_eq!(doc["swagger"], "2.0");
    assert_eq!(doc["info"]["title"], "Music API");
    assert_eq!(doc["info"]["version"], "v1");
    assert_eq!(doc["info"]["description"], "Catalog of songs and playlists");
    assert_eq!(doc["host"], "api.music.example");
    assert_eq!(doc["basePath"], "/v1");
    assert_eq!(doc["schemes"], serde_json::json!(["https"]));
    assert_eq!(doc["consumes"], serde_json::json!(["application/json"]));
    assert_eq!(doc["produces"], serde_json::json!(["application/json"]));
}

#[test]
fn test_definitions() {
    let doc = convert(MUSIC_API);
    let song = &doc["definitions"]["Song"];

    assert_eq!(song["type"], "object");
    assert_eq!(song["description"], "A song in the catalog");
    assert_eq!(song["required"], serde_json::json!(["id", "title"]));
    assert_eq!(song["properties"]["title"]["maxLength"], 200);
    assert_eq!(
        song["properties"]["genre"]["enum"],
        serde_json::json!(["rock", "jazz", "pop"])
    );
    assert_eq!(song["properties"]["released"]["format"], "date");

    let playlist = &doc["definitions"]["Playlist"];
    assert_eq!(playlist["properties"]["songs"]["type"], "array");
    assert_eq!(
        playlist["properties"]["songs"]["items"]["$ref"],
        "#/definitions/Song"
    );
}

#[test]
fn test_paths_and_parameters() {
    let doc = convert(MUSIC_API);
    let paths = doc["paths"].as_object().unwrap();

    let mut keys: Vec<&String> = paths.keys().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["/playlists/{playlistId}/songs", "/songs", "/songs/{songId}"]
    );

    let list = &doc["paths"]["/songs"]["get"];
    assert_eq!(list["summary"], "List songs");
    let params = list["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 2);

    let genre = params.iter().find(|p| p["name"] == "genre").unwrap();
    assert_eq!(genre["in"], "query");
    assert_eq!(genre["required"], false);
    assert_eq!(genre["description"], "Filter by genre");

    let limit = params.iter().find(|p| p["name"] == "limit").unwrap();
    assert_eq!(limit["required"], true);
    assert_eq!(limit["type"], "integer");
    assert_eq!(limit["minimum"], 1);
    assert_eq!(limit["default"], 20);

    let ok = &list["responses"]["200"];
    assert_eq!(ok["description"], "Songs page");
    assert_eq!(ok["schema"]["items"]["$ref"], "#/definitions/Song");
    assert_eq!(ok["headers"]["X-Total-Count"]["type"], "integer");
}

#[test]
fn test_nested_resource_inherits_path_parameter() {
    let doc = convert(MUSIC_API);
    let get = &doc["paths"]["/songs/{songId}"]["get"];

    let song_id = &get["parameters"][0];
    assert_eq!(song_id["name"], "songId");
    assert_eq!(song_id["in"], "path");
    assert_eq!(song_id["required"], true);
    assert_eq!(song_id["description"], "Song identifier");

    assert_eq!(get["responses"]["200"]["description"], "");
    assert_eq!(get["responses"]["404"]["description"], "Not found");

    let delete = &doc["paths"]["/songs/{songId}"]["delete"];
    assert!(delete["responses"]["default"].is_object());
}

#[test]
fn test_body_parameter() {
    let doc = convert(MUSIC_API);

    let post = &doc["paths"]["/songs"]["post"];
    let body = post["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["in"] == "body")
        .unwrap();
    assert_eq!(body["schema"]["$ref"], "#/definitions/Song");

    // body declared without a media type uses the default one
    let put = &doc["paths"]["/playlists/{playlistId}/songs"]["put"];
    let params = put["parameters"].as_array().unwrap();
    assert_eq!(params[0]["name"], "playlistId");
    assert_eq!(params[0]["in"], "path");
    assert_eq!(params[1]["schema"]["$ref"], "#/definitions/Playlist");
    assert!(put.get("consumes").is_none());
}

#[test]
fn test_typed_document_roundtrip() {
    let model = RamlModeler::raml10().model(MUSIC_API).unwrap();
    let spec = Oas20Writer::new().document(&model);

    let get = spec.paths["/songs/{songId}"].get.as_ref().unwrap();
    assert_eq!(get.parameters[0].location, ParameterLocation::Path);
    assert_eq!(spec.definitions.len(), 2);
}

#[tokio::test]
async fn test_dispatcher_uses_builtin_raml10_strategy() {
    let parser = RamlParser::new();
    let output = parser
        .parse(MUSIC_API, &ParserConfig::new(RamlVersion::V10))
        .await
        .unwrap();

    let doc: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(doc["info"]["title"], "Music API");
}

#[test]
fn test_undeclared_type_fails_modeling() {
    let err = RamlModeler::raml10()
        .model("#%RAML 1.0\ntitle: T\n/songs:\n  post:\n    body:\n      application/json:\n        type: Missing\n")
        .unwrap_err();
    assert_eq!(err.to_string(), "Parse error: unknown type 'Missing'");
}

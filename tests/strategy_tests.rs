//! Scenario tables run against both deserialization strategies.
//!
//! Every document is read once with the DOM strategy and once with the SAX strategy; the
//! outcome must be the same for both.

use rstest::rstest;
use schema_json::{from_str_with_options, schema, Error, JsonOptions, Schema, Strategy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::mem::discriminant;

#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
struct Car {
    model: String,
    max_speed: i32,
    owner: Option<Owner>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
struct Owner {
    name: String,
}

schema!(Car {
    model: String => "mark",
    "maxSpeed": i32,
    owner: Option<Owner>,
});

schema!(Owner { name: String });

#[derive(Debug)]
enum Expected {
    Car(&'static str, i32),
    Syntax,
    Value,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
struct Node {
    children: Vec<Node>,
}

schema!(Node { children: Vec<Node> });

fn read<T: Schema + DeserializeOwned>(json: &str, strategy: Strategy) -> Result<T, Error> {
    from_str_with_options(json, JsonOptions::new().with_strategy(strategy))
}

fn nested(levels: usize) -> String {
    format!(
        "{}{}",
        r#"{"children":["#.repeat(levels),
        "]}".repeat(levels)
    )
}

fn car(model: &str, max_speed: i32) -> Car {
    Car {
        model: model.to_string(),
        max_speed,
        owner: None,
    }
}

#[rstest]
#[case::compact(r#"{"mark":"BMW","maxSpeed":160}"#, Expected::Car("BMW", 160))]
#[case::identifier_key(r#"{"model":"BMW","maxSpeed":160}"#, Expected::Car("BMW", 160))]
#[case::reordered(r#"{"maxSpeed":160,"mark":"BMW"}"#, Expected::Car("BMW", 160))]
#[case::whitespace("{\n  \"mark\" : \"BMW\" ,\n\t\"maxSpeed\" :  160\r\n}\n", Expected::Car("BMW", 160))]
#[case::missing_field(r#"{"mark":"BMW"}"#, Expected::Car("BMW", 0))]
#[case::empty_object("{}", Expected::Car("", 0))]
#[case::trailing_comma(r#"{"mark":"BMW",}"#, Expected::Car("BMW", 0))]
#[case::null_owner(r#"{"owner":null,"maxSpeed":1}"#, Expected::Car("", 1))]
#[case::negative(r#"{"maxSpeed":-40}"#, Expected::Car("", -40))]
#[case::missing_brace(r#"{"mark":"BMW","maxSpeed":160"#, Expected::Syntax)]
#[case::truncated_text(r#"{"mark":"BM"#, Expected::Syntax)]
#[case::unknown_field(r#"{"colour":"red"}"#, Expected::Syntax)]
#[case::case_sensitive(r#"{"Model":"BMW"}"#, Expected::Syntax)]
#[case::scalar_document("160", Expected::Syntax)]
#[case::empty_document("", Expected::Syntax)]
#[case::missing_value(r#"{"mark":}"#, Expected::Syntax)]
#[case::unquoted_key(r#"{mark:"BMW"}"#, Expected::Syntax)]
#[case::extra_close(r#"{"mark":"BMW"}}"#, Expected::Syntax)]
#[case::second_document("{} {}", Expected::Syntax)]
#[case::nested_missing_brace(r#"{"owner":{"name":"Ann","maxSpeed":1}"#, Expected::Syntax)]
#[case::trailing_word(r#"{"mark":"BMW"} x"#, Expected::Syntax)]
#[case::trailing_open_quote(r#"{"mark":"BMW"} "x"#, Expected::Syntax)]
#[case::trailing_number(r#"{"mark":"BMW"} 3"#, Expected::Syntax)]
#[case::trailing_member(r#"{"mark":"BMW"}:1"#, Expected::Syntax)]
#[case::bad_number(r#"{"maxSpeed":fast}"#, Expected::Value)]
#[case::overflow(r#"{"maxSpeed":3000000000}"#, Expected::Value)]
#[case::fraction(r#"{"maxSpeed":1.5}"#, Expected::Value)]
#[case::null_number(r#"{"maxSpeed":null}"#, Expected::Value)]
#[case::object_for_text(r#"{"mark":{}}"#, Expected::Value)]
#[case::array_for_number(r#"{"maxSpeed":[1]}"#, Expected::Value)]
#[case::text_for_composite(r#"{"owner":"Ann"}"#, Expected::Value)]
#[case::array_document("[]", Expected::Value)]
fn test_car_documents(
    #[values(Strategy::Dom, Strategy::Sax)] strategy: Strategy,
    #[case] json: &str,
    #[case] expected: Expected,
) {
    let result = read::<Car>(json, strategy);
    match expected {
        Expected::Car(model, max_speed) => assert_eq!(result.unwrap(), car(model, max_speed)),
        Expected::Syntax => assert!(
            matches!(result, Err(Error::InvalidSyntax(_))),
            "{:?}: {:?}",
            strategy,
            result
        ),
        Expected::Value => assert!(
            matches!(result, Err(Error::InvalidValue { .. })),
            "{:?}: {:?}",
            strategy,
            result
        ),
    }
}

#[rstest]
fn test_nested_owner(#[values(Strategy::Dom, Strategy::Sax)] strategy: Strategy) {
    let car = read::<Car>(r#"{"owner":{"name":"Ann"},"mark":"VW"}"#, strategy).unwrap();
    assert_eq!(car.model, "VW");
    assert_eq!(
        car.owner,
        Some(Owner {
            name: "Ann".to_string()
        })
    );
}

#[rstest]
#[case::square("[[1,2],[3,4]]", Some(vec![vec![1, 2], vec![3, 4]]))]
#[case::ragged("[[1],[],[2,3,4]]", Some(vec![vec![1], vec![], vec![2, 3, 4]]))]
#[case::spaced("[ [ 1 , 2 ] , [ 3 ] ]", Some(vec![vec![1, 2], vec![3]]))]
#[case::empty("[]", Some(vec![]))]
#[case::unterminated("[[1,2],[3]", None)]
#[case::object_element("[[1],{}]", None)]
#[case::flat("[1,2]", None)]
#[case::null_row("[null]", None)]
#[case::trailing_element("[[1,2]] 3", None)]
fn test_matrix_documents(
    #[values(Strategy::Dom, Strategy::Sax)] strategy: Strategy,
    #[case] json: &str,
    #[case] expected: Option<Vec<Vec<i32>>>,
) {
    let result = read::<Vec<Vec<i32>>>(json, strategy);
    match expected {
        Some(matrix) => assert_eq!(result.unwrap(), matrix),
        None => assert!(result.is_err()),
    }
}

#[rstest]
#[case(r#"{"mark":"BMW","maxSpeed":160}"#)]
#[case(r#"{"mark":"BMW","maxSpeed":"fast"}"#)]
#[case(r#"{"mark":"BMW","speed":160}"#)]
#[case(r#"{"owner":{"name":"Ann"}"#)]
#[case(r#"{"owner":{"name":["Ann"]}}"#)]
#[case("[[1,2],[3]]")]
#[case("")]
fn test_strategies_agree(#[case] json: &str) {
    let dom = read::<Car>(json, Strategy::Dom);
    let sax = read::<Car>(json, Strategy::Sax);
    match (&dom, &sax) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(b)) => assert_eq!(discriminant(a), discriminant(b), "{} vs {}", a, b),
        _ => panic!("strategies disagree: {:?} vs {:?}", dom, sax),
    }
}

#[rstest]
fn test_nesting_within_limit(#[values(Strategy::Dom, Strategy::Sax)] strategy: Strategy) {
    let mut node = read::<Node>(&nested(60), strategy).unwrap();
    let mut levels = 1;
    while let Some(child) = node.children.pop() {
        node = child;
        levels += 1;
    }
    assert_eq!(levels, 60);
}

#[rstest]
#[case::well_formed(nested(200))]
#[case::unterminated(r#"{"children":["#.repeat(200_000))]
fn test_nesting_beyond_limit(
    #[values(Strategy::Dom, Strategy::Sax)] strategy: Strategy,
    #[case] json: String,
) {
    let result = read::<Node>(&json, strategy);
    assert!(
        matches!(result, Err(Error::InvalidSyntax(_))),
        "{:?}: {:?}",
        strategy,
        result
    );
}

#[rstest]
fn test_configured_nesting_limit(#[values(Strategy::Dom, Strategy::Sax)] strategy: Strategy) {
    let options = JsonOptions::new().with_strategy(strategy).with_max_depth(2);
    let flat: Vec<Vec<i32>> = from_str_with_options("[[1],[2]]", options.clone()).unwrap();
    assert_eq!(flat, vec![vec![1], vec![2]]);

    let result = from_str_with_options::<Vec<Vec<Vec<i32>>>>("[[[1]]]", options);
    assert!(matches!(result, Err(Error::InvalidSyntax(_))), "{:?}", result);
}

#[test]
fn test_unterminated_deep_arrays_do_not_overflow() {
    let json = "[".repeat(200_000);
    let dom = read::<Vec<i32>>(&json, Strategy::Dom);
    assert!(matches!(dom, Err(Error::InvalidSyntax(_))), "{:?}", dom);
    // Single pass stops at the first element that cannot be an i32.
    let sax = read::<Vec<i32>>(&json, Strategy::Sax);
    assert!(matches!(sax, Err(Error::InvalidValue { .. })), "{:?}", sax);
}

#[test]
fn test_structural_and_value_defects_together() {
    let json = r#"{"maxSpeed":"fast","mark":"BMW""#;
    let dom = read::<Car>(json, Strategy::Dom);
    assert!(matches!(dom, Err(Error::InvalidSyntax(_))), "{:?}", dom);
    let sax = read::<Car>(json, Strategy::Sax);
    assert!(matches!(sax, Err(Error::InvalidValue { .. })), "{:?}", sax);
}

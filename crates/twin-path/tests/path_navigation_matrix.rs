use serde_json::json;
use twin_path::{find, format_pointer, get, get_mut, PathError};

fn path(steps: &[&str]) -> Vec<String> {
    steps.iter().map(|s| s.to_string()).collect()
}

#[test]
fn pointer_format_matrix() {
    let cases: [(&[&str], &str); 5] = [
        (&[], ""),
        (&[""], "/"),
        (&["Root", "map"], "/Root/map"),
        (&["a~b", "c/d"], "/a~0b/c~1d"),
        (&["list", "0"], "/list/0"),
    ];

    for (steps, pointer) in cases {
        assert_eq!(format_pointer(&path(steps)), pointer);
    }
}

#[test]
fn get_and_find_agree_matrix() {
    let doc = json!({
        "Root": {
            "settings": {"labels": {"a": "1"}},
            "list": [{"x": true}],
            "empty": null
        }
    });

    let cases: [&[&str]; 4] = [
        &["Root", "settings", "labels"],
        &["Root", "list", "0", "x"],
        &["Root", "empty"],
        &["Root", "missing"],
    ];

    for steps in cases {
        let p = path(steps);
        let via_get = get(&doc, &p);
        let via_find = find(&doc, &p).expect("container exists").val;
        assert_eq!(via_get, via_find, "path {}", format_pointer(&p));
    }
}

#[test]
fn get_mut_then_get_sees_replacement() {
    let mut doc = json!({"Root": {"labels": {"a": "1", "b": "2"}}});
    let p = path(&["Root", "labels"]);

    let slot = get_mut(&mut doc, &p).expect("slot");
    *slot = json!(null);

    assert_eq!(get(&doc, &p), Some(&json!(null)));
}

#[test]
fn find_reports_missing_container() {
    let doc = json!({"Root": {}});
    let p = path(&["Root", "settings", "labels"]);
    assert_eq!(
        find(&doc, &p),
        Err(PathError::NotFound {
            segment: "settings".to_string()
        })
    );
    assert_eq!(get(&doc, &p), None);
}

use std::fs;
use std::path::PathBuf;

use heatfig::rendering::compose::prepare;
use heatfig::{encode_figure, figures};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

#[test]
fn figure_plans_match_recorded_goldens() {
    for entry in figures::catalog() {
        let spec = (entry.build)().expect("figure builds");
        let plan = prepare(&spec.layout, &spec.style).expect("figure plans");
        let actual = serde_json::json!({
            "width": plan.width,
            "height": plan.height,
            "rows": plan.rows,
        });

        let expected_path = golden_path(&format!("{}.plan.json", entry.name));
        if std::env::var("UPDATE_GOLDENS").is_ok() {
            fs::create_dir_all("tests/goldens/expected").ok();
            let text = serde_json::to_string_pretty(&actual).expect("serialize plan");
            fs::write(&expected_path, text + "\n").expect("write golden");
            continue;
        }

        let exp = fs::read_to_string(&expected_path).expect("plan golden is committed");
        let expected: serde_json::Value = serde_json::from_str(&exp).expect("golden is JSON");
        assert_eq!(actual, expected, "{} rows drifted from its golden", entry.name);
    }
}

#[test]
fn figures_match_recorded_digests() {
    for entry in figures::catalog() {
        let spec = (entry.build)().expect("figure builds");
        let fig = encode_figure(&spec).expect("figure renders");
        let digest = fig.digest();

        let expected_path = golden_path(&format!("{}.sha256", entry.name));
        if std::env::var("UPDATE_GOLDENS").is_ok() {
            fs::create_dir_all("tests/goldens/expected").ok();
            fs::write(&expected_path, &digest).expect("write golden");
            println!("Updated golden: {:?}", expected_path);
            continue;
        }

        if !expected_path.exists() {
            println!(
                "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
                expected_path
            );
            continue;
        }

        let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
        assert_eq!(digest, exp.trim(), "{} drifted from its golden", entry.file_name);
    }
}

#[test]
fn repeated_renders_are_pixel_identical() {
    let spec = figures::demographic_comparison().unwrap();
    let decode = |bytes: &[u8]| {
        let mut reader = png::Decoder::new(bytes).read_info().expect("decodes");
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("frame");
        buf.truncate(info.buffer_size());
        buf
    };

    let a = encode_figure(&spec).unwrap();
    let b = encode_figure(&spec).unwrap();
    assert_eq!(a.png_data, b.png_data);
    assert_eq!(decode(&a.png_data), decode(&b.png_data));
    assert_eq!(hex::decode(a.digest()).unwrap().len(), 32);
}

use heatfig::rendering::layout::{plan, LayoutSpec, Region};
use heatfig::rendering::text::TextBlock;
use heatfig::style::TextStyle;
use heatfig::{Spacing, StyleConfig};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn three_rows_with_spacing() {
    let bands = plan(&[1.0, 4.0, 1.0], 60.0, 600.0).unwrap();
    let got: Vec<(f64, f64)> = bands.iter().map(|b| (b.start, b.end)).collect();
    let want = [(0.0, 80.0), (140.0, 460.0), (520.0, 600.0)];
    for (g, w) in got.iter().zip(want.iter()) {
        assert!(close(g.0, w.0) && close(g.1, w.1), "got {:?}, want {:?}", got, want);
    }
}

#[test]
fn bands_are_ordered_proportional_and_evenly_spaced() {
    let ratios = [0.6, 4.0, 0.3, 0.3, 1.0, 0.7];
    let total = 560.0;
    let spacing = 17.5;
    let bands = plan(&ratios, spacing, total).unwrap();

    assert_eq!(bands.len(), ratios.len());
    assert_eq!(bands[0].start, 0.0);
    assert!(close(bands.last().unwrap().end, total));

    let available = total - spacing * (ratios.len() - 1) as f64;
    let sum: f64 = ratios.iter().sum();
    for (i, b) in bands.iter().enumerate() {
        assert!(b.start < b.end, "row {i} is empty");
        assert!(close(b.extent(), available * ratios[i] / sum), "row {i} out of proportion");
        if i > 0 {
            assert!(close(b.start - bands[i - 1].end, spacing), "gap before row {i}");
        }
    }
}

#[test]
fn single_row_takes_everything() {
    let bands = plan(&[2.5], 40.0, 300.0).unwrap();
    assert_eq!(bands.len(), 1);
    assert_eq!((bands[0].start, bands[0].end), (0.0, 300.0));
}

#[test]
fn invalid_plans_are_config_errors() {
    assert!(plan(&[], 0.0, 600.0).unwrap_err().is_config());
    assert!(plan(&[1.0, 0.0], 0.0, 600.0).unwrap_err().is_config());
    assert!(plan(&[1.0, -2.0], 0.0, 600.0).unwrap_err().is_config());
    assert!(plan(&[1.0, 1.0], 700.0, 600.0).unwrap_err().is_config());
    assert!(plan(&[1.0, 1.0], -1.0, 600.0).unwrap_err().is_config());
}

#[test]
fn mean_row_spacing_matches_gap_over_mean_height() {
    let extent = 560.0;
    let rows = 6;
    let gap = Spacing::FractionOfMeanRow(0.5).resolve(extent, rows).unwrap();
    let mean_row = (extent - gap * (rows - 1) as f64) / rows as f64;
    assert!(close(gap, 0.5 * mean_row));

    assert_eq!(Spacing::FractionOfMeanRow(0.5).resolve(extent, 1).unwrap(), 0.0);
    assert!(close(Spacing::FractionOfExtent(0.1).resolve(extent, rows).unwrap(), 56.0));
    assert!(Spacing::Absolute(f64::NAN).resolve(extent, rows).unwrap_err().is_config());
}

#[test]
fn row_rects_stay_inside_the_padding() {
    let text = || TextBlock::new("x", TextStyle::new(10.0));
    let spec = LayoutSpec::new(10.0, 6.0)
        .spacing(Spacing::Absolute(10.0))
        .region(Region::title(1.0, text()))
        .region(Region::spacer(2.0))
        .region(Region::caption(1.0, text()));
    let style = StyleConfig::default();

    let rows = spec.row_rects(&style).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].y, 20);
    assert_eq!(rows[2].bottom(), 580);
    for r in &rows {
        assert_eq!((r.x, r.width), (20, 960));
    }
    for pair in rows.windows(2) {
        assert!(!pair[0].overlaps(&pair[1]));
        assert!(pair[0].bottom() <= pair[1].y);
    }
}

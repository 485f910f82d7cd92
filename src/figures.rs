//! The four report figures and the hardcoded data behind them.
//!
//! Each builder returns a complete [`FigureSpec`] with its own
//! [`StyleConfig`]; nothing is shared between figures except constants.

use crate::dataset::Dataset;
use crate::rendering::layout::{LayoutSpec, Region, Spacing};
use crate::rendering::paint::{Anchor, HAlign, Stroke, VAlign};
use crate::rendering::plot::{
    Annotation, Axis, BarGroups, BarSeries, Coord, LabelPlacement, Legend, LegendPlacement, Marks,
    PlotPayload, PlotPoint, RefLine, ShadedBand, Ticks,
};
use crate::rendering::table::TablePayload;
use crate::rendering::text::TextBlock;
use crate::style::{Color, SpineRule, StyleConfig, TextStyle};
use crate::{FigureSpec, Result};

/// A figure the driver knows how to build
pub struct FigureEntry {
    pub name: &'static str,
    pub file_name: &'static str,
    pub build: fn() -> Result<FigureSpec>,
}

pub fn catalog() -> Vec<FigureEntry> {
    vec![
        FigureEntry {
            name: "hvi",
            file_name: "hvi_by_neighborhood.png",
            build: hvi_by_neighborhood,
        },
        FigureEntry {
            name: "health",
            file_name: "health_burden_comparison.png",
            build: health_burden_comparison,
        },
        FigureEntry {
            name: "trigger",
            file_name: "trigger_vs_events.png",
            build: trigger_vs_events,
        },
        FigureEntry {
            name: "demographic",
            file_name: "demographic_comparison.png",
            build: demographic_comparison,
        },
    ]
}

fn palette(entries: &[(&str, &str)]) -> Result<Vec<(String, Color)>> {
    entries
        .iter()
        .map(|(k, hex)| Ok((k.to_string(), Color::from_hex(hex)?)))
        .collect()
}

pub fn neighborhoods() -> Result<Dataset> {
    Dataset::from_columns(
        "neighborhoods",
        vec![
            (
                "Neighborhood",
                vec![
                    "Morrisania/East Tremont".into(),
                    "Brownsville".into(),
                    "Hunts Point/Mott Haven".into(),
                    "Chelsea".into(),
                    "Upper East Side".into(),
                    "Brooklyn Heights".into(),
                ],
            ),
            ("HVI", vec![5.into(), 5.into(), 4.into(), 3.into(), 2.into(), 1.into()]),
            (
                "MedianIncome",
                vec![25.into(), 30.into(), 24.into(), 60.into(), 101.into(), 85.into()],
            ),
            (
                "PctWithoutAC",
                vec![24.2.into(), 20.1.into(), 15.7.into(), 12.0.into(), 3.1.into(), 5.2.into()],
            ),
            (
                "PctBlackLatino",
                vec![60.into(), 75.into(), 55.into(), 25.into(), 10.into(), 15.into()],
            ),
        ],
    )
}

pub fn health_metrics() -> Result<Dataset> {
    Dataset::from_columns(
        "health_metrics",
        vec![
            (
                "Metric",
                vec![
                    "Asthma Rate (%)".into(),
                    "% Over 65".into(),
                    "ER Visits (per 10k)".into(),
                    "Heat Deaths (per mil)".into(),
                ],
            ),
            (
                "Morrisania/East Tremont",
                vec![12.2.into(), 15.into(), 18.5.into(), 0.8.into()],
            ),
            ("Upper East Side", vec![4.1.into(), 21.into(), 6.4.into(), 0.4.into()]),
        ],
    )
}

pub fn triggers() -> Result<Dataset> {
    Dataset::from_columns(
        "triggers",
        vec![
            (
                "Neighborhood",
                vec!["Morrisania".into(), "Hunts Point".into(), "Upper East Side".into()],
            ),
            ("TriggerHI", vec![89.into(), 91.5.into(), 97.into()]),
            ("Events", vec![7.into(), 3.into(), 1.into()]),
            ("HVI", vec![5.into(), 5.into(), 2.into()]),
            ("PctWithoutAC", vec![24.2.into(), 15.7.into(), 3.1.into()]),
            ("MedianIncome", vec!["$25k".into(), "$24k".into(), "$101k".into()]),
        ],
    )
}

pub fn demographics() -> Result<Dataset> {
    Dataset::from_columns(
        "demographics",
        vec![
            (
                "Metric",
                vec![
                    "% Without AC".into(),
                    "% Black/Latino".into(),
                    "% Under Poverty".into(),
                    "% Seniors".into(),
                    "SVI Score".into(),
                ],
            ),
            ("Brownsville", vec![18.3.into(), 80.into(), 38.into(), 13.into(), 0.85.into()]),
            ("Upper East Side", vec![3.1.into(), 10.into(), 7.into(), 21.into(), 0.18.into()]),
        ],
    )
}

/// Bubble chart of HVI per neighborhood with a statistics table underneath.
pub fn hvi_by_neighborhood() -> Result<FigureSpec> {
    let data = neighborhoods()?;
    // horizontal/vertical spread chosen for legibility, one per row
    const X: [f64; 6] = [89.0, 90.0, 91.5, 93.0, 97.0, 95.0];
    const Y: [f64; 6] = [6.0, 5.0, 3.0, 2.0, 1.0, 0.5];

    let hvi = data.numbers("HVI")?;
    let points = hvi
        .iter()
        .zip(X.iter().zip(Y.iter()))
        .map(|(h, (x, y))| {
            let point = PlotPoint::new(*x, *y, 200.0, format!("{}", *h as i64)).label(format!("HVI {}", *h as i64));
            // the most vulnerable neighborhoods get a heavier outline
            if *h >= 5.0 {
                point.edge_width(1.5)
            } else {
                point
            }
        })
        .collect();

    let mut plot = PlotPayload::new(
        Axis::new(88.0, 98.0).label("Geographic Distribution").rotated(45.0),
        Axis::new(0.0, 8.0).label("Vulnerability Level").bold_ticks(),
        Marks::Scatter(points),
    );
    plot.palette = palette(&[
        ("5", "#800000"),
        ("4", "#663399"),
        ("3", "#006400"),
        ("2", "#003366"),
        ("1", "#FFFFFF"),
    ])?;
    plot.marker_alpha = 0.6;
    plot.y_grid = true;
    plot.label_placement = LabelPlacement::Above(15.0);
    plot.label_style = TextStyle::new(9.0).bold();
    plot.tick_style = TextStyle::new(12.0);
    plot.axis_label_style = TextStyle::new(12.0);

    let mut table = TablePayload::from_dataset(
        &data,
        &["Neighborhood", "PctWithoutAC", "PctBlackLatino", "MedianIncome", "HVI"],
        &["Neighborhood", "% Without AC", "% Black/Latino", "Median Income (k)", "HVI"],
    )?
    .plain_header();
    table.row_scale = 0.9;

    let mapping = "HVI 5 = Morrisania/East Tremont, Brownsville; HVI 4 = Hunts Point/Mott Haven; \
                   HVI 3 = Chelsea; HVI 2 = Upper East Side; HVI 1 = Brooklyn Heights";

    let style = StyleConfig {
        background: Color::from_hex("#F5F2E8")?,
        spines: SpineRule::all(1.5, Color::BLACK),
        ..StyleConfig::default()
    };

    Ok(FigureSpec {
        name: "hvi".into(),
        file_name: "hvi_by_neighborhood.png".into(),
        style,
        layout: LayoutSpec::new(12.0, 9.0)
            .spacing(Spacing::FractionOfExtent(0.01))
            .region(Region::title(
                0.5,
                TextBlock::new("NYC Heat Vulnerability Index by Neighborhood", TextStyle::new(16.0).bold()),
            ))
            .region(Region::subtitle(
                0.35,
                TextBlock::new(
                    "Social Vulnerability Distribution Across NYC Districts",
                    TextStyle::new(12.0).italic(),
                ),
            ))
            .region(Region::plot(4.0, plot))
            .region(Region::caption(0.45, TextBlock::new(mapping, TextStyle::new(9.0)).boxed()))
            .region(Region::table(1.4, table)),
    })
}

/// Grouped bars comparing health outcomes in two neighborhoods.
pub fn health_burden_comparison() -> Result<FigureSpec> {
    let data = health_metrics()?;
    let series_names = ["Morrisania/East Tremont", "Upper East Side"];
    let series = series_names
        .iter()
        .map(|name| {
            Ok(BarSeries {
                name: name.to_string(),
                values: data.numbers(name)?,
                color_key: name.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let categories = data.strings("Metric")?;
    let n = categories.len() as f64;

    let mut plot = PlotPayload::new(
        Axis::new(-0.5, n - 0.5)
            .label("Metric")
            .ticks(Ticks::Categories(categories.clone())),
        Axis::new(0.0, 24.0).label("Rate per 10 k / % / Deaths per M"),
        Marks::Bars(BarGroups {
            categories,
            series,
            width: 0.25,
        }),
    );
    plot.palette = palette(&[(series_names[0], "#003366"), (series_names[1], "#606060")])?;
    plot.legend = Some(Legend {
        title: Some("Neighborhood".into()),
        entries: series_names.iter().map(|s| (s.to_string(), s.to_string())).collect(),
        placement: LegendPlacement::OutsideRight,
        framed: false,
    });
    plot.axis_label_style = TextStyle::new(12.0);

    let footnote = TextStyle::new(9.0).italic().color(Color::GRAY);

    Ok(FigureSpec {
        name: "health".into(),
        file_name: "health_burden_comparison.png".into(),
        style: StyleConfig::default(),
        layout: LayoutSpec::new(12.0, 6.0)
            .spacing(Spacing::Absolute(6.0))
            .region(Region::title(
                0.8,
                TextBlock::new(
                    "Health Impact of Extreme Heat (2010\u{2013}22): ER Visits, Asthma & Heat Deaths by Neighborhood",
                    TextStyle::new(14.0),
                ),
            ))
            .region(Region::plot(5.0, plot))
            .region(Region::caption(
                0.3,
                TextBlock::new(
                    "Sources: NYC DOHMH Community Health Profiles (2018\u{2013}2022) for ER visits & asthma;",
                    footnote.clone(),
                ),
            ))
            .region(Region::caption(
                0.3,
                TextBlock::new(
                    "NYC DOH Heat Mortality Reports (2010\u{2013}2020 avg.) for heat deaths; U.S. Census ACS (2019\u{2013}2021) for age breakdown.",
                    footnote,
                ),
            )),
    })
}

/// The composite figure: title, bubble chart, spacer, subtitle, table, caption.
pub fn trigger_vs_events() -> Result<FigureSpec> {
    let data = triggers()?;
    let names = data.strings("Neighborhood")?;
    let xs = data.numbers("TriggerHI")?;
    let ys = data.numbers("Events")?;
    let hvi = data.numbers("HVI")?;

    let points = names
        .iter()
        .zip(xs.iter().zip(ys.iter()))
        .zip(hvi.iter())
        .map(|((name, (x, y)), h)| PlotPoint::new(*x, *y, 150.0, format!("{}", *h as i64)).label(name.clone()))
        .collect();

    let mut plot = PlotPayload::new(
        Axis::new(87.0, 99.0).label("Trigger Heat Index (\u{b0}F)"),
        Axis::new(0.0, 8.0).label("Events (2018-2022)"),
        Marks::Scatter(points),
    );
    plot.palette = palette(&[("5", "#800000"), ("2", "#000080")])?;
    plot.marker_alpha = 0.95;
    plot.band = Some(ShadedBand {
        x0: 88.0,
        x1: 95.0,
        color: Color::from_hex("#FFCCCC")?.with_alpha(0.3),
    });
    plot.ref_lines = vec![RefLine::Vertical {
        x: 95.0,
        stroke: Stroke::dashed(Color::GRAY, 2.0),
    }];
    plot.label_placement = LabelPlacement::Right(0.5);
    plot.label_style = TextStyle::new(10.0);
    plot.legend = Some(Legend {
        title: Some("HVI".into()),
        entries: vec![("5".into(), "HVI 5".into()), ("2".into(), "HVI 2".into())],
        placement: LegendPlacement::UpperRight,
        framed: true,
    });
    plot.spines = Some(SpineRule::open(1.0, Color::BLACK));

    let mut table = TablePayload::from_dataset(
        &data,
        &["Neighborhood", "PctWithoutAC", "MedianIncome"],
        &["Neighborhood", "% Without AC", "Median Income"],
    )?
    .grid(Stroke::solid(Color::BLACK, 1.0));
    table.row_scale = 0.9;

    Ok(FigureSpec {
        name: "trigger".into(),
        file_name: "trigger_vs_events.png".into(),
        style: StyleConfig::default(),
        layout: LayoutSpec::new(10.0, 9.0)
            .spacing(Spacing::FractionOfMeanRow(0.5))
            .region(Region::title(
                0.6,
                TextBlock::new("3-day HI Trigger vs Payout Events by Neighborhood", TextStyle::new(18.0).bold()),
            ))
            .region(Region::plot(4.0, plot))
            .region(Region::spacer(0.3))
            .region(Region::subtitle(
                0.3,
                TextBlock::new(
                    "Lower trigger thresholds concentrate payouts in vulnerable neighborhoods",
                    TextStyle::new(13.0).italic(),
                ),
            ))
            .region(Region::table(1.0, table))
            .region(Region::caption(
                0.7,
                TextBlock::new(
                    "Lower trigger thresholds and more payouts concentrate in vulnerable neighborhoods, proving policy fairness.",
                    TextStyle::new(10.0),
                ),
            )),
    })
}

/// Grouped bars of social and demographic drivers, Brownsville vs Upper East Side.
pub fn demographic_comparison() -> Result<FigureSpec> {
    let data = demographics()?;
    let metrics = data.strings("Metric")?;
    let bro = data.numbers("Brownsville")?;
    let ues = data.numbers("Upper East Side")?;
    let n = metrics.len() as f64;
    let width = 0.35;

    let black_latino = data
        .column("Metric")?
        .iter()
        .position(|m| m.as_str() == Some("% Black/Latino"))
        .unwrap_or(1);
    // Brownsville is the left bar of each group
    let bar_x = black_latino as f64 - width / 2.0;
    let bar_top = bro[black_latino];

    let mut plot = PlotPayload::new(
        Axis::new(-0.5, n - 0.5).ticks(Ticks::Categories(metrics.clone())).rotated(45.0),
        Axis::new(0.0, 95.0).label("Percent / Index"),
        Marks::Bars(BarGroups {
            categories: metrics,
            series: vec![
                BarSeries {
                    name: "Brownsville".into(),
                    values: bro,
                    color_key: "bro".into(),
                },
                BarSeries {
                    name: "Upper East Side".into(),
                    values: ues,
                    color_key: "ues".into(),
                },
            ],
            width,
        }),
    );
    plot.palette = palette(&[("bro", "#003366"), ("ues", "#7F7F7F")])?;
    plot.y_grid = true;
    plot.grid_dashed = true;
    plot.spines = Some(SpineRule::open(1.0, Color::BLACK));
    plot.axis_label_style = TextStyle::new(12.0);
    plot.ref_lines = vec![RefLine::Horizontal {
        y: 20.0,
        stroke: Stroke::dashed(Color::RED, 1.0),
    }];
    plot.annotations = vec![
        Annotation::new(
            "Critical AC access threshold",
            Coord::Data(n - 0.6, 21.0),
            TextStyle::new(10.0).color(Color::RED),
        )
        .anchor(Anchor::new(HAlign::Right, VAlign::Bottom)),
        Annotation::new(
            "8\u{d7} higher vulnerability",
            Coord::Data(bar_x, bar_top + 8.0),
            TextStyle::new(9.0),
        )
        .arrow_to(bar_x, bar_top),
        Annotation::new(
            "Projected 15% reduction in ER visits",
            Coord::Axes(0.6, 0.7),
            TextStyle::new(9.0),
        )
        .anchor(Anchor::new(HAlign::Left, VAlign::Top))
        .boxed(),
    ];
    plot.legend = Some(Legend {
        title: None,
        entries: vec![
            ("bro".into(), "Brownsville".into()),
            ("ues".into(), "Upper East Side".into()),
        ],
        placement: LegendPlacement::OutsideRight,
        framed: false,
    });

    let style = StyleConfig {
        font_family: "Liberation Sans".into(),
        grid_color: Color::LIGHT_GRAY.with_alpha(0.2),
        ..StyleConfig::default()
    };

    Ok(FigureSpec {
        name: "demographic".into(),
        file_name: "demographic_comparison.png".into(),
        style,
        layout: LayoutSpec::new(9.0, 6.0)
            .spacing(Spacing::Absolute(6.0))
            .region(Region::title(
                0.5,
                TextBlock::new("Heat Vulnerability Drivers: Brownsville vs. UES", TextStyle::new(16.0).bold()),
            ))
            .region(Region::subtitle(
                0.4,
                TextBlock::new(
                    "High social vulnerability & low AC access \u{2192} elevated heat illness risk",
                    TextStyle::new(12.0).italic(),
                ),
            ))
            .region(Region::plot(4.0, plot))
            .region(Region::caption(
                0.3,
                TextBlock::new(
                    "Parametric trigger: AC-lack >20% & 2-day heat-index \u{2265} 95 \u{b0}F",
                    TextStyle::new(9.0).italic().color(Color::GRAY),
                ),
            )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::compose::prepare;
    use crate::rendering::layout::Content;

    #[test]
    fn every_figure_builds_and_plans() {
        for entry in catalog() {
            let fig = (entry.build)().unwrap();
            assert_eq!(fig.name, entry.name);
            assert_eq!(fig.file_name, entry.file_name);
            let plan = prepare(&fig.layout, &fig.style).unwrap();
            assert_eq!(plan.rows.len(), fig.layout.regions.len());
        }
    }

    #[test]
    fn styling_is_per_figure() {
        assert_eq!(trigger_vs_events().unwrap().style.font_family, "Arial");
        assert_eq!(demographic_comparison().unwrap().style.font_family, "Liberation Sans");
    }

    #[test]
    fn trigger_figure_uses_the_six_row_layout() {
        let fig = trigger_vs_events().unwrap();
        assert_eq!(fig.layout.ratios(), vec![0.6, 4.0, 0.3, 0.3, 1.0, 0.7]);
    }

    fn plot_of(fig: &FigureSpec) -> &PlotPayload {
        fig.layout
            .regions
            .iter()
            .find_map(|r| match &r.content {
                Content::Plot(p) => Some(p.as_ref()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn figure_details_follow_the_reference_charts() {
        let hvi = hvi_by_neighborhood().unwrap();
        let Marks::Scatter(points) = &plot_of(&hvi).marks else {
            panic!("HVI figure is a scatter plot");
        };
        for p in points {
            let expected = if p.color_key == "5" { Some(1.5) } else { None };
            assert_eq!(p.edge_width, expected, "{}", p.color_key);
        }

        let health = health_burden_comparison().unwrap();
        assert_eq!(plot_of(&health).x.label.as_deref(), Some("Metric"));

        let demo = demographic_comparison().unwrap();
        assert!(plot_of(&demo).y_grid && plot_of(&demo).grid_dashed);
    }
}

//! Token clustering. Tokens are grouped into baseline runs, runs are
//! split at large horizontal gaps, and stacked tolerance lines are merged
//! back onto the value they belong to.

use crate::geometry::{BBox, PageGeometry};

const LINE_GAP_FACTOR: f32 = 1.5;
const MERGE_MAX_GAP: f32 = 15.0;
const MERGE_MAX_LINES: usize = 2;

/// A candidate callout: one or more tokens read as a unit.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub token_indices: Vec<usize>,
    pub bbox: BBox,
    pub font_size: f32,
    pub text: String,
}

/// Group the page's tokens into single line clusters.
pub fn cluster_lines(page: &PageGeometry) -> Vec<Cluster> {
    let mut order: Vec<usize> = (0..page.tokens.len()).collect();
    order.sort_by(|&a, &b| {
        let (ta, tb) = (&page.tokens[a], &page.tokens[b]);
        ta.bbox
            .center()
            .y
            .total_cmp(&tb.bbox.center().y)
            .then(ta.bbox.x0.total_cmp(&tb.bbox.x0))
    });

    struct LineAcc {
        baseline: f32,
        font: f32,
        indices: Vec<usize>,
    }

    let mut lines: Vec<LineAcc> = Vec::new();
    for idx in order {
        let tok = &page.tokens[idx];
        let cy = tok.bbox.center().y;
        let fits = lines
            .last()
            .map(|acc| (cy - acc.baseline).abs() <= 0.5 * acc.font.max(tok.font_size))
            .unwrap_or(false);
        if fits {
            if let Some(acc) = lines.last_mut() {
                acc.font = acc.font.max(tok.font_size);
                acc.indices.push(idx);
            }
        } else {
            lines.push(LineAcc {
                baseline: cy,
                font: tok.font_size,
                indices: vec![idx],
            });
        }
    }

    let mut clusters = Vec::new();
    for mut line in lines {
        line.indices
            .sort_by(|&a, &b| page.tokens[a].bbox.x0.total_cmp(&page.tokens[b].bbox.x0));
        let mut run: Vec<usize> = Vec::new();
        for idx in line.indices {
            if let Some(&prev) = run.last() {
                let gap = page.tokens[idx].bbox.x0 - page.tokens[prev].bbox.x1;
                let font = page.tokens[prev]
                    .font_size
                    .max(page.tokens[idx].font_size);
                if gap > LINE_GAP_FACTOR * font {
                    clusters.extend(build_cluster(page, std::mem::take(&mut run)));
                }
            }
            run.push(idx);
        }
        clusters.extend(build_cluster(page, run));
    }
    clusters
}

/// Merge stacked tolerance lines into the value line above them. A line
/// starting with a sign, `±`, `/`, a bare `0` or a lone count like `4X`
/// is a continuation, and a value takes at most two of them.
pub fn merge_stacked(clusters: Vec<Cluster>) -> Vec<Cluster> {
    let mut order: Vec<usize> = (0..clusters.len()).collect();
    order.sort_by(|&a, &b| {
        clusters[a]
            .bbox
            .center()
            .y
            .total_cmp(&clusters[b].bbox.center().y)
            .then(clusters[a].bbox.x0.total_cmp(&clusters[b].bbox.x0))
    });

    let mut consumed = vec![false; clusters.len()];
    let mut merged = Vec::new();
    for &i in &order {
        if consumed[i] || is_continuation_text(&clusters[i].text) {
            continue;
        }
        consumed[i] = true;
        let mut acc = clusters[i].clone();
        for _ in 0..MERGE_MAX_LINES {
            let next = order
                .iter()
                .copied()
                .filter(|&j| {
                    !consumed[j]
                        && is_continuation_text(&clusters[j].text)
                        && is_adjacent(&acc, &clusters[j])
                })
                .min_by(|&a, &b| clusters[a].bbox.y0.total_cmp(&clusters[b].bbox.y0));
            match next {
                Some(j) => {
                    consumed[j] = true;
                    append(&mut acc, &clusters[j]);
                }
                None => break,
            }
        }
        merged.push(acc);
    }

    // Continuations nothing claimed stay as standalone clusters.
    for &i in &order {
        if !consumed[i] {
            merged.push(clusters[i].clone());
        }
    }
    merged
}

fn is_continuation_text(text: &str) -> bool {
    let t = text.trim();
    if t == "0" || t.starts_with(['+', '-', '±', '/']) {
        return true;
    }
    // A stacked count modifier belongs to the value it counts.
    crate::parse::next_count_token(t).is_some_and(|(_, rest)| rest.trim().is_empty())
}

fn is_adjacent(base: &Cluster, other: &Cluster) -> bool {
    let a = &base.bbox;
    let b = &other.bbox;
    let v_gap = (b.y0 - a.y1).max(a.y0 - b.y1).max(0.0);
    if v_gap >= MERGE_MAX_GAP {
        return false;
    }
    let pad = base.font_size;
    b.x0 < a.x1 + pad && b.x1 > a.x0 - pad
}

fn append(acc: &mut Cluster, other: &Cluster) {
    acc.token_indices.extend_from_slice(&other.token_indices);
    acc.bbox = acc.bbox.union(&other.bbox);
    acc.font_size = acc.font_size.max(other.font_size);
    acc.text.push(' ');
    acc.text.push_str(&other.text);
}

fn build_cluster(page: &PageGeometry, indices: Vec<usize>) -> Option<Cluster> {
    let first = *indices.first()?;
    let mut bbox = page.tokens[first].bbox;
    let mut font = page.tokens[first].font_size;
    let mut text = page.tokens[first].text.clone();
    for &idx in &indices[1..] {
        let tok = &page.tokens[idx];
        bbox = bbox.union(&tok.bbox);
        font = font.max(tok.font_size);
        text.push(' ');
        text.push_str(&tok.text);
    }
    Some(Cluster {
        token_indices: indices,
        bbox,
        font_size: font,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TextToken;

    fn tok(text: &str, x0: f32, y0: f32) -> TextToken {
        let w = 6.0 * text.chars().count() as f32;
        TextToken {
            text: text.to_string(),
            bbox: BBox {
                x0,
                y0,
                x1: x0 + w,
                y1: y0 + 8.0,
            },
            font_size: 8.0,
        }
    }

    fn page(tokens: Vec<TextToken>) -> PageGeometry {
        PageGeometry {
            index: 0,
            tokens,
            strokes: Vec::new(),
        }
    }

    #[test]
    fn test_tokens_on_a_baseline_join() {
        let p = page(vec![
            tok("12.50", 100.0, 200.0),
            tok("±", 134.0, 200.0),
            tok("0.05", 144.0, 200.0),
        ]);
        let clusters = cluster_lines(&p);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].text, "12.50 ± 0.05");
        assert_eq!(clusters[0].token_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_far_token_splits_the_line() {
        let p = page(vec![
            tok("12.50", 100.0, 200.0),
            tok("30.00", 300.0, 200.0),
        ]);
        let clusters = cluster_lines(&p);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_separate_baselines_stay_apart() {
        let p = page(vec![
            tok("12.50", 100.0, 200.0),
            tok("30.00", 100.0, 230.0),
        ]);
        let clusters = cluster_lines(&p);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_stacked_deviations_merge() {
        let p = page(vec![
            tok("8.00", 100.0, 200.0),
            tok("+0.10", 100.0, 210.0),
            tok("-0.02", 100.0, 220.0),
        ]);
        let clusters = merge_stacked(cluster_lines(&p));
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].text, "8.00 +0.10 -0.02");
        assert_eq!(clusters[0].token_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_bare_zero_merges() {
        let p = page(vec![
            tok("12.1", 100.0, 200.0),
            tok("+0.1", 100.0, 210.0),
            tok("0", 100.0, 220.0),
        ]);
        let clusters = merge_stacked(cluster_lines(&p));
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].text, "12.1 +0.1 0");
    }

    #[test]
    fn test_stacked_count_modifier_merges() {
        let p = page(vec![
            tok("5.00 ± 0.05", 100.0, 200.0),
            tok("4X", 100.0, 212.0),
        ]);
        let clusters = merge_stacked(cluster_lines(&p));
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].text, "5.00 ± 0.05 4X");
    }

    #[test]
    fn test_distant_sign_line_does_not_merge() {
        let p = page(vec![
            tok("8.00", 100.0, 200.0),
            tok("+0.10", 100.0, 260.0),
        ]);
        let clusters = merge_stacked(cluster_lines(&p));
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_merge_stops_at_two_continuations() {
        let p = page(vec![
            tok("8.00", 100.0, 200.0),
            tok("+0.10", 100.0, 210.0),
            tok("-0.02", 100.0, 220.0),
            tok("-0.05", 100.0, 230.0),
        ]);
        let clusters = merge_stacked(cluster_lines(&p));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].text, "8.00 +0.10 -0.02");
        assert_eq!(clusters[1].text, "-0.05");
    }
}

use crate::model::*;

// ── Free-slot computation ─────────────────────────────────────────

/// Sub-intervals of `query` that no booking of `room` touches, in order.
pub fn free_spans(room: &Room, query: &Span) -> Vec<Span> {
    let busy: Vec<Span> = room
        .overlapping(query.start, query.end)
        .map(|b| Span::new(b.start().max(query.start), b.end().min(query.end)))
        .collect();
    // Sorted by start, but may overlap if added outside the engine.
    let busy = merge_overlapping(&busy);
    subtract_intervals(&[*query], &busy)
}

/// Merge sorted overlapping/adjacent intervals into disjoint intervals.
pub fn merge_overlapping(sorted: &[Span]) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
    for &span in sorted {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// `base` minus `to_remove`. Both inputs sorted and disjoint.
pub fn subtract_intervals(base: &[Span], to_remove: &[Span]) -> Vec<Span> {
    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut cursor = b.start;

        while ri < to_remove.len() && to_remove[ri].end <= cursor {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].start < b.end {
            let r = to_remove[j];
            if r.start > cursor {
                result.push(Span::new(cursor, r.start));
            }
            cursor = cursor.max(r.end);
            j += 1;
        }

        if cursor < b.end {
            result.push(Span::new(cursor, b.end));
        }
    }

    result
}

//! Text normalization shared by every variant the generator emits.

/// Lower-case, turn commas into spaces, collapse every run of two or more
/// whitespace characters into one space, then trim.
///
/// A lone whitespace character other than a space (e.g. a single tab) is
/// left as-is; only runs are collapsed.
pub fn normalize_name(input: &str) -> String {
    let lowered = input.to_lowercase().replace(',', " ");
    collapse_whitespace_runs(&lowered).trim().to_string()
}

fn collapse_whitespace_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run: Option<char> = None;
    let mut run_len = 0usize;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if run_len == 0 {
                run = Some(ch);
            }
            run_len += 1;
            continue;
        }
        flush_run(&mut out, run, run_len);
        run = None;
        run_len = 0;
        out.push(ch);
    }
    flush_run(&mut out, run, run_len);
    out
}

#[inline]
fn flush_run(out: &mut String, run: Option<char>, run_len: usize) {
    match (run, run_len) {
        (_, 0) => {}
        (Some(c), 1) => out.push(c),
        _ => out.push(' '),
    }
}

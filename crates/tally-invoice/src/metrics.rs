//! Text width estimation for the built-in Helvetica fonts
//!
//! Built-in PDF fonts carry no metrics in printpdf, so right alignment and
//! truncation use the standard Helvetica advance widths (units of 1/1000 em).

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Font weight used for a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// Advance width of one character in 1/1000 em (Helvetica).
fn glyph_width(c: char, weight: Weight) -> f32 {
    let regular = match c {
        ' ' | '.' | ',' | ':' | ';' | '!' | '/' | '\\' | 'f' | 't' | 'I' => 278.0,
        'i' | 'j' | 'l' | '\'' | '|' => 222.0,
        '-' | '(' | ')' | 'r' => 333.0,
        '0'..='9' | '#' | '$' | '_' | '?' | 'L' => 556.0,
        'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 556.0,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500.0,
        'm' | 'M' => 833.0,
        'w' => 722.0,
        'W' => 944.0,
        'F' | 'T' | 'Z' => 611.0,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722.0,
        'G' | 'O' | 'Q' => 778.0,
        'A'..='Z' => 667.0,
        _ => 556.0,
    };

    match weight {
        Weight::Regular => regular,
        // Digits and punctuation share widths; letters are slightly wider.
        Weight::Bold if c.is_alphabetic() => regular * 1.06,
        Weight::Bold => regular,
    }
}

/// Width of `text` in millimetres at `size` points.
pub fn text_width_mm(text: &str, size: f32, weight: Weight) -> f32 {
    let em: f32 = text.chars().map(|c| glyph_width(c, weight)).sum();
    em / 1000.0 * size / PT_PER_MM
}

/// Cuts `text` so that it fits in `max_mm`, ending with `...` when cut.
pub fn truncate_to_width(text: &str, max_mm: f32, size: f32, weight: Weight) -> String {
    if text_width_mm(text, size, weight) <= max_mm {
        return text.to_string();
    }

    let budget = max_mm - text_width_mm("...", size, weight);
    let mut out = String::new();
    let mut used = 0.0;
    for c in text.chars() {
        let w = glyph_width(c, weight) / 1000.0 * size / PT_PER_MM;
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

//! Line geometry used when the caret moves between lines.

/// Maps caret offsets to lines of a field's text.
pub trait LineModel: Send + Sync {
    fn line_index(&self, text: &[char], offset: usize) -> usize;

    fn line_text(&self, text: &[char], index: usize) -> String;
}

/// Treats the whole field as a single line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleLine;

impl LineModel for SingleLine {
    fn line_index(&self, _text: &[char], _offset: usize) -> usize {
        0
    }

    fn line_text(&self, text: &[char], _index: usize) -> String {
        text.iter().collect()
    }
}

/// Lines separated by `'\n'`. A line's text excludes its terminator, so an
/// empty line yields `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewlineLines;

impl LineModel for NewlineLines {
    fn line_index(&self, text: &[char], offset: usize) -> usize {
        let offset = offset.min(text.len());
        text[..offset].iter().filter(|&&ch| ch == '\n').count()
    }

    fn line_text(&self, text: &[char], index: usize) -> String {
        text.split(|&ch| ch == '\n')
            .nth(index)
            .map(|line| line.iter().collect())
            .unwrap_or_default()
    }
}

use crate::error_handling::*;
use crate::tables::Tables;

use std::iter;

fn is_operator(character: char) -> bool {
    matches!(character, '+' | '-' | '*' | '/' | '^')
}

fn is_identifier_char(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_'
}

fn is_digit_or_dot(character: char) -> bool {
    character.is_ascii_digit() || character == '.'
}

pub fn discard_spaces(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Turns unary minus into subtraction from zero: a leading `-` and any `-`
/// right after `(` get a `0` in front. Expressions without such a minus are
/// returned unchanged.
pub fn rewrite_negatives(expression: &str) -> String {
    let mut rewritten = String::with_capacity(expression.len() + 1);
    let mut previous = None;
    for character in expression.chars() {
        if character == '-' && matches!(previous, None | Some('(')) {
            rewritten.push('0');
        }
        rewritten.push(character);
        previous = Some(character);
    }
    rewritten
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    identifier,
    number,
    operator,
    open_bracket,
    close_bracket,
}

impl CharClass {
    fn of(character: char) -> Result<Self> {
        use CharClass::*;
        match character {
            c if is_identifier_char(c) => Ok(identifier),
            c if is_digit_or_dot(c) => Ok(number),
            c if is_operator(c) => Ok(operator),
            '(' => Ok(open_bracket),
            ')' => Ok(close_bracket),
            c => Err(CalcError::invalid_character(c)),
        }
    }

    /// Operators and brackets are always blocks of their own.
    fn is_single(self) -> bool {
        use CharClass::*;
        matches!(self, operator | open_bracket | close_bracket)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    number,
    operator,
    function,
    constant,
    variable,
    open_bracket,
    close_bracket,
}

/// A classified segment `start..end` of the normalized expression.
///
/// `level` is the bracket depth: an open bracket, its contents and its
/// closing bracket all share the depth inside the pair, so `(1)` is three
/// blocks at level 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
    pub level: usize,
    pub kind: BlockKind,
}

impl Block {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

struct BlockScanner<'a> {
    source: &'a str,
    tables: &'a Tables,
    blocks: Vec<Block>,
    current: Option<CharClass>,
    start: usize,
    level: usize,
}

impl<'a> BlockScanner<'a> {
    fn new(source: &'a str, tables: &'a Tables) -> Self {
        Self{source, tables, blocks: Vec::new(), current: None, start: 0, level: 0}
    }

    /// Handles the character of class `class` at `index`; `None` marks the
    /// position one past the end.
    fn advance(&mut self, index: usize, class: Option<CharClass>) -> Result<()> {
        use CharClass::*;

        let single = self.current.is_some_and(CharClass::is_single);
        let mut boundary = single || class != self.current || class.is_none();
        // digits after letters keep extending the identifier
        boundary &= !(class == Some(number) && self.current == Some(identifier));

        if boundary {
            if let Some(current) = self.current {
                self.close_run(current, index)?;
            }
            self.current = class;
            self.start = index;
        }
        if class == Some(open_bracket) {
            self.level += 1;
        }
        Ok(())
    }

    fn close_run(&mut self, class: CharClass, end: usize) -> Result<()> {
        let kind = match class {
            CharClass::identifier => self.tables.resolve(&self.source[self.start..end])?,
            CharClass::number => BlockKind::number,
            CharClass::operator => BlockKind::operator,
            CharClass::open_bracket => BlockKind::open_bracket,
            CharClass::close_bracket => BlockKind::close_bracket,
        };
        self.blocks.push(Block{start: self.start, end, level: self.level, kind});

        if kind == BlockKind::close_bracket {
            self.level = self.level.checked_sub(1).ok_or(CalcError::unpaired_brackets)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Block>> {
        if self.level != 0 {
            return Err(CalcError::unpaired_brackets);
        }
        Ok(self.blocks)
    }
}

/// Splits a space-free expression into blocks in one left-to-right pass,
/// resolving identifiers against `tables`.
pub fn group(source: &str, tables: &Tables) -> Result<Vec<Block>> {
    let mut scanner = BlockScanner::new(source, tables);
    let positions = source
        .char_indices()
        .map(|(index, character)| (index, Some(character)))
        .chain(iter::once((source.len(), None)));

    for (index, character) in positions {
        let class = character.map(CharClass::of).transpose()?;
        scanner.advance(index, class)?;
    }
    let blocks = scanner.finish()?;
    tracing::trace!(?blocks, "grouped {source}");
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use super::BlockKind::*;

    fn kinds<'a>(source: &'a str, tables: &Tables) -> Vec<(&'a str, usize, BlockKind)> {
        group(source, tables)
            .unwrap()
            .into_iter()
            .map(|block| (block.text(source), block.level, block.kind))
            .collect()
    }

    #[test]
    fn negative_signs() {
        assert_eq!(rewrite_negatives("-5+3"), "0-5+3");
        assert_eq!(rewrite_negatives("(-5+3)"), "(0-5+3)");
        assert_eq!(rewrite_negatives("2*(-(-1))"), "2*(0-(0-1))");
        assert_eq!(rewrite_negatives("5-3"), "5-3");
        assert_eq!(rewrite_negatives(&rewrite_negatives("-(-1)")), rewrite_negatives("-(-1)"));
    }

    #[test]
    fn spaces_are_discarded() {
        assert_eq!(discard_spaces(" 1 +\t2 "), "1+2");
    }

    #[test]
    fn blocks_cover_expression() {
        let tables = Tables::new();
        assert_eq!(
            kinds("12.5+sqrt(pi)", &tables),
            vec![
                ("12.5", 0, number),
                ("+", 0, operator),
                ("sqrt", 0, function),
                ("(", 1, open_bracket),
                ("pi", 1, constant),
                (")", 1, close_bracket),
            ]
        );
    }

    #[test]
    fn nested_levels() {
        let tables = Tables::new();
        let levels: Vec<usize> = group("((1)+2)*3", &tables)
            .unwrap()
            .iter()
            .map(|block| block.level)
            .collect();
        assert_eq!(levels, vec![1, 2, 2, 2, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn operators_and_brackets_never_merge() {
        let tables = Tables::new();
        assert_eq!(group("1--2", &tables).unwrap().len(), 4);
        assert_eq!(group("((1))", &tables).unwrap().len(), 5);
    }

    #[test]
    fn identifiers_absorb_trailing_digits() {
        let mut tables = Tables::new();
        tables.declare("x1", Value::from(1)).unwrap();
        assert_eq!(kinds("x1", &tables), vec![("x1", 0, variable)]);
        assert_eq!(group("x12", &tables), Err(CalcError::undefined("x12".into())));
        assert_eq!(group("x1.5", &tables), Err(CalcError::undefined("x1.5".into())));
    }

    #[test]
    fn digits_before_letters_split() {
        let tables = Tables::new();
        assert_eq!(kinds("2pi", &tables), vec![("2", 0, number), ("pi", 0, constant)]);
    }

    #[test]
    fn failures() {
        let tables = Tables::new();
        assert_eq!(group("(1+2", &tables), Err(CalcError::unpaired_brackets));
        assert_eq!(group(")(", &tables), Err(CalcError::unpaired_brackets));
        assert_eq!(group("1%2", &tables), Err(CalcError::invalid_character('%')));
        assert_eq!(group("foo+1", &tables), Err(CalcError::undefined("foo".into())));
    }

    #[test]
    fn empty_source_has_no_blocks() {
        assert_eq!(group("", &Tables::new()), Ok(vec![]));
    }
}

//! Nom-based line tokenizer.
//!
//! Splits one line into borrowed tag section, prefix, command and parameters.
//! Tag splitting and unescaping happen later, in [`super::parse`].

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

/// Parameters kept inline before spilling to the heap. Twitch frames rarely
/// carry more than two.
const INLINE_PARAMS: usize = 4;

fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_till(|c| c == ' '))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// `command = 1*letter / 3digit`
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let letters = cmd.bytes().all(|b| b.is_ascii_alphabetic());
    let numeric = cmd.len() == 3 && cmd.bytes().all(|b| b.is_ascii_digit());
    if letters || numeric {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Consume parameters up to the end of the line. Runs of spaces count as one
/// separator; a parameter starting with `:` swallows the rest of the line.
fn parse_params(input: &str) -> (&str, SmallVec<[&str; INLINE_PARAMS]>) {
    let mut params = SmallVec::new();
    let mut rest = input;

    loop {
        let trimmed = rest.trim_start_matches(' ');
        if trimmed.len() == rest.len() {
            // end of line, or a parameter glued to the previous token
            break;
        }
        rest = trimmed;
        if rest.is_empty() || rest.starts_with(['\r', '\n']) {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            let end = trailing.find(['\r', '\n']).unwrap_or(trailing.len());
            params.push(&trailing[..end]);
            rest = &trailing[end..];
            break;
        }

        let end = rest.find([' ', '\r', '\n']).unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    (rest, params)
}

fn parse_line(input: &str) -> IResult<&str, ParsedMessage<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let (rest, params) = parse_params(input);

    Ok((
        rest,
        ParsedMessage {
            tags,
            prefix,
            command,
            params,
        },
    ))
}

/// One tokenized line, borrowing from the input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedMessage<'a> {
    /// Raw tag section without the leading `@`.
    pub tags: Option<&'a str>,
    /// Prefix without the leading `:`.
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: SmallVec<[&'a str; INLINE_PARAMS]>,
}

impl<'a> ParsedMessage<'a> {
    pub fn parse(input: &'a str) -> Result<Self, LineError> {
        match parse_line(input) {
            Ok((_rest, msg)) => Ok(msg),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(LineError {
                position: input.len() - e.input.len(),
                kind: e.code,
            }),
            Err(nom::Err::Incomplete(_)) => Err(LineError {
                position: input.len(),
                kind: ErrorKind::Eof,
            }),
        }
    }
}

/// Where and why tokenizing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineError {
    pub position: usize,
    pub kind: ErrorKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ping() {
        let msg = ParsedMessage::parse("PING :tmi.twitch.tv").unwrap();
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params.as_slice(), &["tmi.twitch.tv"]);
        assert!(msg.tags.is_none());
        assert!(msg.prefix.is_none());
    }

    #[test]
    fn test_parse_tags_prefix_and_trailing() {
        let line = "@badges=;color=#0D4200 :ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :Kappa Keepo\r\n";
        let msg = ParsedMessage::parse(line).unwrap();
        assert_eq!(msg.tags, Some("badges=;color=#0D4200"));
        assert_eq!(msg.prefix, Some("ronni!ronni@ronni.tmi.twitch.tv"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params.as_slice(), &["#dallas", "Kappa Keepo"]);
    }

    #[test]
    fn test_parse_numeric() {
        let msg = ParsedMessage::parse(":tmi.twitch.tv 001 justinfan123 :Welcome, GLHF!").unwrap();
        assert_eq!(msg.command, "001");
        assert_eq!(msg.params.as_slice(), &["justinfan123", "Welcome, GLHF!"]);
    }

    #[test]
    fn test_parse_multiple_spaces() {
        let msg = ParsedMessage::parse("CAP  * ACK   :twitch.tv/tags").unwrap();
        assert_eq!(msg.params.as_slice(), &["*", "ACK", "twitch.tv/tags"]);
    }

    #[test]
    fn test_parse_empty_trailing() {
        let msg = ParsedMessage::parse("PRIVMSG #dallas :").unwrap();
        assert_eq!(msg.params.as_slice(), &["#dallas", ""]);
    }

    #[test]
    fn test_glued_parameter_is_ignored() {
        let msg = ParsedMessage::parse("PING").unwrap();
        assert!(msg.params.is_empty());
        assert!(ParsedMessage::parse("JOIN#dallas").unwrap().params.is_empty());
    }

    #[test]
    fn test_rejects_mixed_command() {
        assert!(ParsedMessage::parse("PR1VMSG #dallas").is_err());
        assert!(ParsedMessage::parse("12 foo").is_err());
    }

    #[test]
    fn test_error_position() {
        let err = ParsedMessage::parse("@a=b :prefix !!!").unwrap_err();
        assert_eq!(err.position, 13);
    }
}

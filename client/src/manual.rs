use anyhow::{Context, Result, bail};
use rotom_battle::{Action, Decision, ParseError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::request::DecisionRequest;
use crate::surface::DecisionMaker;

/// Decisions typed by a human
///
/// Each answer is one line: an action, an optional `tera` flag and a free
/// text reason, e.g. `move 2 tera fastest way to break the wall`.
pub struct ManualDecisionMaker<R, W> {
    input: R,
    output: W,
}

impl ManualDecisionMaker<BufReader<Stdin>, Stdout> {
    /// Read answers from stdin, print requests to stdout
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ManualDecisionMaker<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    async fn show(&mut self, request: &DecisionRequest) -> Result<()> {
        let options: Vec<&str> = request.legal_actions.iter().map(Action::as_str).collect();
        let text = format!(
            "{}\nOptions: {}\n> ",
            request.prompt.trim_end(),
            options.join(", ")
        );
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}

impl<R, W> DecisionMaker for ManualDecisionMaker<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn decide(&mut self, request: &DecisionRequest) -> Result<Decision> {
        self.show(request).await.context("Failed to show request")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .context("Failed to read answer")?;
        if read == 0 {
            bail!("Input closed");
        }

        parse_answer(&line).with_context(|| format!("Could not understand {:?}", line.trim()))
    }
}

/// Parse `<action> [tera] [reason...]`
pub fn parse_answer(line: &str) -> Result<Decision, ParseError> {
    let mut words = line.split_whitespace().peekable();
    let first = words
        .next()
        .ok_or_else(|| ParseError::MissingField("action".to_string()))?;

    // "move2" or "move 2"
    let action: Action = if first.chars().any(|c| c.is_ascii_digit()) {
        first.parse()?
    } else {
        let slot = words.next().unwrap_or_default();
        format!("{first} {slot}").parse()?
    };

    let terastallize = words
        .next_if(|word| word.eq_ignore_ascii_case("tera"))
        .is_some();
    let reason = words.collect::<Vec<_>>().join(" ");

    Ok(Decision::new(action, terastallize, reason))
}

#[cfg(test)]
mod tests {
    use rotom_battle::TeraOffer;

    use super::*;
    use crate::request::RequestKind;

    fn request() -> DecisionRequest {
        DecisionRequest {
            kind: RequestKind::Turn,
            turn: 3,
            legal_actions: vec![Action::Move1, Action::Switch2],
            tera: TeraOffer::NotOffered,
            rejection: None,
            prompt: "Battle log so far:\n".to_string(),
        }
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(
            parse_answer("Move 2"),
            Ok(Decision::new(Action::Move2, false, ""))
        );
        assert_eq!(
            parse_answer("switch3 pivot out of the Ground move"),
            Ok(Decision::new(Action::Switch3, false, "pivot out of the Ground move"))
        );
        assert_eq!(
            parse_answer("move 1 TERA  go for it"),
            Ok(Decision::new(Action::Move1, true, "go for it"))
        );
        assert!(parse_answer("").is_err());
        assert!(parse_answer("run away").is_err());
    }

    #[tokio::test]
    async fn test_decide_reads_one_line() {
        let input: &[u8] = b"move 1 tera finish it\nswitch 2\n";
        let mut output = Vec::new();

        let decision = {
            let mut maker = ManualDecisionMaker::new(input, &mut output);
            maker.decide(&request()).await.unwrap()
        };

        assert_eq!(decision, Decision::new(Action::Move1, true, "finish it"));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Options: Move 1, Switch 2"));
    }

    #[tokio::test]
    async fn test_closed_input() {
        let input: &[u8] = b"";
        let mut maker = ManualDecisionMaker::new(input, Vec::new());
        assert!(maker.decide(&request()).await.is_err());
    }
}

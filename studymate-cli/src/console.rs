//! Interactive question console.

use std::fmt::Write as _;
use std::path::Path;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use studymate_rag::{Answer, Session, append_log};
use tracing::{debug, error, warn};

/// Read questions from the terminal until `exit`, `quit`, Ctrl-C or Ctrl-D.
///
/// Each answered question is printed with its sources and, when `log_file`
/// is set, appended to it. A failed question is reported and the console
/// keeps running.
pub async fn run_console(session: &Session, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("question> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            break;
        }
        remember_question(&mut editor, question);

        match session.ask(question).await {
            Ok(answer) => {
                println!("{}", render_answer(&answer));
                if let Some(path) = log_file {
                    log_answer(path, &answer);
                }
            }
            Err(e) => {
                error!(error = %e, "question failed");
                eprintln!("Error: {e}");
            }
        }
    }

    Ok(())
}

/// Add `question` to the line editor's recall history. Failures are logged
/// at debug level.
fn remember_question(editor: &mut DefaultEditor, question: &str) {
    match editor.add_history_entry(question) {
        Ok(added) => debug!(added, "recorded console history entry"),
        Err(e) => debug!(error = %e, "failed to record console history entry"),
    }
}

/// Append the answer's history record to `path`, warning on failure.
fn log_answer(path: &Path, answer: &Answer) {
    if let Err(e) = append_log(path, &answer.record()) {
        warn!(path = %path.display(), error = %e, "failed to append history log");
    }
}

/// Format an answer followed by its numbered source passages.
pub fn render_answer(answer: &Answer) -> String {
    let mut out = format!("Answer:\n{}\n", answer.answer.trim());
    for (i, source) in answer.sources.iter().enumerate() {
        let _ = write!(
            out,
            "\nSource {} ({}, distance {:.4}):\n{}\n",
            i + 1,
            source.chunk.document_id,
            source.distance,
            source.chunk.text.trim()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use rustyline::history::History;
    use studymate_rag::{Chunk, QaRecord, RetrievedChunk};

    use super::*;

    fn sky_answer() -> Answer {
        Answer::from_record(
            QaRecord::new("What color is the sky?", "Blue.\n"),
            vec![RetrievedChunk {
                chunk: Chunk {
                    position: 0,
                    document_id: "sky.txt".into(),
                    text: "The sky is blue.".into(),
                },
                distance: 0.5,
            }],
        )
    }

    #[test]
    fn renders_answer_then_sources() {
        let answer = sky_answer();

        assert_eq!(
            render_answer(&answer),
            "Answer:\nBlue.\n\nSource 1 (sky.txt, distance 0.5000):\nThe sky is blue.\n"
        );
    }

    #[test]
    fn logging_an_answer_appends_its_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("qa_history.txt");

        log_answer(&path, &sky_answer());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Q: What color is the sky?\nA: Blue.\n"));
    }

    #[test]
    fn asked_questions_are_kept_for_recall() {
        let mut editor = DefaultEditor::new().unwrap();

        remember_question(&mut editor, "What color is the sky?");
        remember_question(&mut editor, "Where is Paris?");

        assert_eq!(editor.history().len(), 2);
    }
}

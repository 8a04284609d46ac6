//! Serving the worker protocol over a byte stream.
//!
//! Requests arrive as JSON lines on the input, responses leave as JSON lines
//! on the output. The worker behind the stream is the same one
//! [`Worker::spawn`] starts, so ordering and staleness behave exactly as
//! they do in process.

use playground_protocol::{decode_request, encode_response, WorkerMessage};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::error::{Result, RuntimeError};
use crate::runtime::EmbeddedRuntime;
use crate::worker::{Worker, WorkerConfig};

/// Serve one worker over `input`/`output` until `input` reaches end of file
/// and every queued request has been answered.
///
/// Lines that do not decode as a request are logged and skipped; without an
/// id there is no session to report the failure against.
pub async fn serve_stdio<R, I, O>(
    runtime: R,
    config: WorkerConfig,
    input: I,
    output: O,
) -> Result<()>
where
    R: EmbeddedRuntime,
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let (handle, responses) = Worker::spawn(runtime, config);
    let inbox = handle.sender();

    let reading = read_requests(input, inbox);
    let writing = write_responses(responses, output);
    let outcome = tokio::try_join!(reading, writing);
    handle.shutdown().await;
    outcome.map(|_| ())
}

async fn read_requests<I>(input: I, inbox: mpsc::UnboundedSender<WorkerMessage>) -> Result<()>
where
    I: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match decode_request(&line) {
            Ok(request) => {
                tracing::trace!(session = %request.id, "request received");
                inbox
                    .send(WorkerMessage::Request(request))
                    .map_err(|_| RuntimeError::ChannelClosed)?;
            }
            Err(err) => tracing::warn!(error = %err, "skipping malformed request"),
        }
    }
    tracing::debug!("input closed, draining worker");
    // The worker finishes what is queued, then stops and closes responses.
    let _ = inbox.send(WorkerMessage::Shutdown);
    Ok(())
}

async fn write_responses<O>(
    mut responses: mpsc::UnboundedReceiver<playground_protocol::Response>,
    mut output: O,
) -> Result<()>
where
    O: AsyncWrite + Unpin,
{
    while let Some(response) = responses.recv().await {
        let mut line = encode_response(&response)?;
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use playground_protocol::{decode_response, Response, SessionId};

    use super::*;
    use crate::testing::ScriptedRuntime;

    #[tokio::test]
    async fn answers_each_request_line() {
        let input = concat!(
            r#"{"id":1,"html":"<div><p>Welcome</p></div>","config":{"indent":"2"}}"#,
            "\n",
            "this is not json\n",
            "\n",
            r#"{"id":2,"html":"{% raise %}","config":{}}"#,
            "\n",
        );
        let mut output = Vec::new();
        serve_stdio(
            ScriptedRuntime::new(),
            WorkerConfig::default(),
            input.as_bytes(),
            &mut output,
        )
        .await
        .unwrap();

        let responses: Vec<Response> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| decode_response(line).unwrap())
            .collect();
        let results: Vec<_> = responses.iter().filter(|r| !r.is_lifecycle()).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            &Response::html(SessionId::new(1), "<div>\n  <p>Welcome</p>\n</div>")
        );
        assert!(matches!(results[1], Response::Error { id, .. } if id.get() == 2));
        assert!(responses.iter().any(Response::is_ready));
    }

    #[tokio::test]
    async fn fractional_option_is_answered_with_an_error() {
        let input = concat!(
            r#"{"id":1,"html":"<div><p>a</p></div>","config":{"indent":4.5}}"#,
            "\n",
        );
        let mut output = Vec::new();
        serve_stdio(
            ScriptedRuntime::new(),
            WorkerConfig::default(),
            input.as_bytes(),
            &mut output,
        )
        .await
        .unwrap();

        let results: Vec<Response> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| decode_response(line).unwrap())
            .filter(|r| !r.is_lifecycle())
            .collect();
        assert_eq!(results.len(), 1);
        assert!(
            matches!(&results[0], Response::Error { id, message } if id.get() == 1 && message.contains("4.5"))
        );
    }

    #[tokio::test]
    async fn empty_input_still_bootstraps() {
        let mut output = Vec::new();
        serve_stdio(
            ScriptedRuntime::new(),
            WorkerConfig::default(),
            &b""[..],
            &mut output,
        )
        .await
        .unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.lines().last().unwrap().contains(r#""message":"ready""#));
    }
}

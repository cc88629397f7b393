//! Remote Kernel Adapter
//!
//! Talks to a Kernel service over HTTP/JSON. Each operation is a request to
//! `{base_url}/{operation}`; request and response bodies are the serde forms
//! of the types in `kernel::types`.
//!
//! Uses the blocking reqwest client: the gateway only calls the Kernel from
//! blocking workers, never from an async task.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    CorpusHeader, CsvOutcome, Kernel, KernelError, KernelResult, PassageOutcome, PassageQuery,
    ProvenanceEntry, RenderOptions, SearchOutcome, TableKind, TableOutcome,
};

#[derive(Serialize)]
struct SearchBody<'a> {
    task: &'a str,
    batch: usize,
    offset: usize,
    options: &'a RenderOptions,
}

#[derive(Serialize)]
struct TableBody<'a> {
    kind: TableKind,
    task: &'a str,
    options: &'a RenderOptions,
}

#[derive(Serialize)]
struct PassageBody<'a> {
    #[serde(flatten)]
    query: &'a PassageQuery,
    options: &'a RenderOptions,
}

#[derive(Serialize)]
struct CsvsBody<'a> {
    task: &'a str,
    tuples: &'a str,
    sections: &'a str,
    options: &'a RenderOptions,
}

/// HTTP client for a Kernel service
pub struct RemoteKernel {
    client: Client,
    base_url: String,
}

impl RemoteKernel {
    /// Build a client for the Kernel at `base_url`.
    ///
    /// `request_timeout` is a transport ceiling; `None` leaves deadline
    /// enforcement to the gateway's guard alone.
    pub fn new(base_url: &str, request_timeout: Option<Duration>) -> KernelResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| KernelError::Transport {
            message: e.to_string(),
        })?;

        Ok(RemoteKernel {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/{operation}", self.base_url)
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, operation: &str, body: &B) -> KernelResult<R> {
        self.send(self.client.post(self.endpoint(operation)).json(body))
    }

    fn get<R: DeserializeOwned>(&self, operation: &str) -> KernelResult<R> {
        self.send(self.client.get(self.endpoint(operation)))
    }

    fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> KernelResult<R> {
        let response = request.send().map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::GATEWAY_TIMEOUT || status == StatusCode::REQUEST_TIMEOUT {
            return Err(KernelError::TimedOut);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(KernelError::failed(if body.is_empty() {
                format!("Kernel answered {status}")
            } else {
                body
            }));
        }

        response.json::<R>().map_err(|e| KernelError::Decode {
            message: e.to_string(),
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> KernelError {
    if e.is_timeout() {
        KernelError::TimedOut
    } else {
        KernelError::Transport {
            message: e.to_string(),
        }
    }
}

impl Kernel for RemoteKernel {
    fn search(
        &self,
        task: &str,
        batch: usize,
        offset: usize,
        options: &RenderOptions,
    ) -> KernelResult<SearchOutcome> {
        self.post(
            "search",
            &SearchBody {
                task,
                batch,
                offset,
                options,
            },
        )
    }

    fn table(
        &self,
        kind: TableKind,
        task: &str,
        options: &RenderOptions,
    ) -> KernelResult<TableOutcome> {
        self.post("table", &TableBody { kind, task, options })
    }

    fn passage(
        &self,
        query: &PassageQuery,
        options: &RenderOptions,
    ) -> KernelResult<PassageOutcome> {
        self.post("passage", &PassageBody { query, options })
    }

    fn csvs(
        &self,
        task: &str,
        tuples: &str,
        sections: &str,
        options: &RenderOptions,
    ) -> KernelResult<CsvOutcome> {
        self.post(
            "csvs",
            &CsvsBody {
                task,
                tuples,
                sections,
                options,
            },
        )
    }

    fn header(&self) -> KernelResult<CorpusHeader> {
        self.get("header")
    }

    fn css(&self) -> KernelResult<String> {
        self.get("css")
    }

    fn provenance(&self) -> KernelResult<Vec<ProvenanceEntry>> {
        self.get("provenance")
    }

    fn set_names(&self) -> KernelResult<Vec<String>> {
        self.get("setnames")
    }
}

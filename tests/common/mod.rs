//! Scripted in-process Kernel with call counters.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use corpus_gateway::kernel::{
    CorpusHeader, CsvOutcome, CsvTable, Kernel, KernelError, KernelResult, Message,
    PassageOutcome, PassageQuery, ProvenanceEntry, RenderOptions, SearchOutcome, TableKind,
    TableOutcome,
};
use corpus_gateway::{NegativeQueryCache, QueryGateway};

/// Total number of results every successful search reports
pub const TOTAL_RESULTS: usize = 45;

#[derive(Default)]
pub struct ScriptedKernel {
    /// Tasks that block for `hang` before answering
    slow: HashSet<String>,
    hang: Duration,
    /// Tasks for which the Kernel itself reports a timeout
    kernel_timeouts: HashSet<String>,
    /// Tasks the Kernel rejects, with the error text
    failures: HashMap<String, String>,
    /// Tasks the Kernel rejects without any message
    silent_failures: HashSet<String>,
    /// Metadata calls report an unreachable Kernel
    metadata_down: bool,
    set_names: Vec<String>,

    pub search_calls: AtomicUsize,
    pub table_calls: AtomicUsize,
    pub passage_calls: AtomicUsize,
    pub csvs_calls: AtomicUsize,
    pub metadata_calls: AtomicUsize,
}

impl ScriptedKernel {
    pub fn new() -> Self {
        ScriptedKernel::default()
    }

    pub fn slow(mut self, task: &str, hang: Duration) -> Self {
        self.slow.insert(task.to_string());
        self.hang = hang;
        self
    }

    pub fn kernel_timeout(mut self, task: &str) -> Self {
        self.kernel_timeouts.insert(task.to_string());
        self
    }

    pub fn failing(mut self, task: &str, message: &str) -> Self {
        self.failures.insert(task.to_string(), message.to_string());
        self
    }

    pub fn failing_silently(mut self, task: &str) -> Self {
        self.silent_failures.insert(task.to_string());
        self
    }

    pub fn metadata_down(mut self) -> Self {
        self.metadata_down = true;
        self
    }

    pub fn with_set_names(mut self, names: &[&str]) -> Self {
        self.set_names = names.iter().map(ToString::to_string).collect();
        self
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn tables(&self) -> usize {
        self.table_calls.load(Ordering::SeqCst)
    }

    pub fn csvs_count(&self) -> usize {
        self.csvs_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_count(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    /// Shared behaviour of the guarded operations
    fn run_script(&self, task: &str) -> KernelResult<Option<String>> {
        if self.slow.contains(task) {
            std::thread::sleep(self.hang);
        }
        if self.kernel_timeouts.contains(task) {
            return Err(KernelError::TimedOut);
        }
        Ok(self.failures.get(task).cloned())
    }
}

impl Kernel for ScriptedKernel {
    fn search(
        &self,
        task: &str,
        batch: usize,
        offset: usize,
        options: &RenderOptions,
    ) -> KernelResult<SearchOutcome> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.silent_failures.contains(task) {
            return Ok(SearchOutcome {
                status: false,
                ..Default::default()
            });
        }
        if let Some(error) = self.run_script(task)? {
            return Ok(SearchOutcome {
                content: None,
                status: false,
                messages: vec![Message::error(error)],
                ..Default::default()
            });
        }
        Ok(SearchOutcome {
            content: Some(format!("<table>{task} [{offset}+{batch}]</table>")),
            status: true,
            messages: vec![],
            features: (!options.features.is_empty()).then(|| options.features.clone()),
            start: offset,
            total: TOTAL_RESULTS,
        })
    }

    fn table(
        &self,
        kind: TableKind,
        task: &str,
        _options: &RenderOptions,
    ) -> KernelResult<TableOutcome> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.get(task) {
            return Ok(TableOutcome {
                content: None,
                messages: vec![Message::error(error.clone())],
            });
        }
        Ok(TableOutcome {
            content: Some(format!("<table class=\"{}\">{task}</table>", kind.as_str())),
            messages: vec![],
        })
    }

    fn passage(
        &self,
        query: &PassageQuery,
        _options: &RenderOptions,
    ) -> KernelResult<PassageOutcome> {
        self.passage_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PassageOutcome {
            content: Some(format!("<div>{}</div>", query.sec0)),
            section_type: "book".to_string(),
            passages: vec!["Genesis".to_string(), "Exodus".to_string()],
            nav_level: 1,
        })
    }

    fn csvs(
        &self,
        task: &str,
        _tuples: &str,
        _sections: &str,
        _options: &RenderOptions,
    ) -> KernelResult<CsvOutcome> {
        self.csvs_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.run_script(task)? {
            return Ok(CsvOutcome {
                status: false,
                messages: vec![Message::error(error)],
                ..Default::default()
            });
        }
        let table = |name: &str| CsvTable {
            name: name.to_string(),
            rows: vec![vec!["R".to_string(), "S1".to_string()]],
        };
        Ok(CsvOutcome {
            status: true,
            messages: vec![],
            csvs: vec![table("sections"), table("tuples")],
            tuple_results: Some(table("resultsx")),
            query_results: Some(table("results")),
        })
    }

    fn header(&self) -> KernelResult<CorpusHeader> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if self.metadata_down {
            return Err(KernelError::Transport {
                message: "down".to_string(),
            });
        }
        Ok(CorpusHeader {
            colofon: "<span>corpus</span>".to_string(),
            header: "<h1>corpus</h1>".to_string(),
            app_logo: "[app]".to_string(),
            tf_logo: "[tf]".to_string(),
        })
    }

    fn css(&self) -> KernelResult<String> {
        Ok(".r{}".to_string())
    }

    fn provenance(&self) -> KernelResult<Vec<ProvenanceEntry>> {
        Ok(vec![ProvenanceEntry {
            corpus: "org/corpus".to_string(),
            version: "1.0".to_string(),
            release: None,
            doi: None,
        }])
    }

    fn set_names(&self) -> KernelResult<Vec<String>> {
        Ok(self.set_names.clone())
    }
}

pub fn gateway(kernel: &Arc<ScriptedKernel>, limit: Duration) -> QueryGateway {
    QueryGateway::new(
        Arc::clone(kernel) as Arc<dyn Kernel>,
        Arc::new(NegativeQueryCache::new()),
        limit,
    )
}

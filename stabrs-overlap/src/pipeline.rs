//! Concurrent fan-out of a query stream over a shared, read-only [`OverlapTree`].
//!
//! One producer thread pulls records from the query stream, stamps each with a sequence number
//! and pushes it onto a bounded channel. `threads` workers pull from that channel, query the
//! tree and push a [`QueryAnswer`] onto a second bounded channel. A supervisor joins the workers
//! and then drops its sender, which closes the answer channel. The calling thread drains the
//! answers into a sink, reordering them back into input order unless told not to.
//!
//! When reordering, the producer also takes a token from a third bounded channel before it
//! sends each query, and the drain side hands the token back once that query's answer has
//! reached the sink. At most [`reorder_window`] queries are therefore between the producer and
//! the sink, so a slow query cannot make the reorder buffer grow without bound.
use std::collections::{BTreeMap, VecDeque};
use std::error::Error;
use std::io;
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded, select};
use log::{debug, info};

use stabrs_core::models::Interval;

use crate::errors::OverlapError;
use crate::options::OverlapOptions;
use crate::overlap_tree::OverlapTree;

/// A query together with every stored interval it matched.
#[derive(Debug)]
pub struct QueryAnswer<'a, Q, T> {
    /// Position of the query in the input stream, starting at 0.
    pub seq: u64,
    pub query: Q,
    pub matches: Vec<&'a T>,
}

/// Totals gathered while draining the answer channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub queries: usize,
    pub queries_with_matches: usize,
    pub total_matches: usize,
}

impl PipelineStats {
    fn record<Q, T>(&mut self, answer: &QueryAnswer<'_, Q, T>) {
        self.queries += 1;
        if !answer.matches.is_empty() {
            self.queries_with_matches += 1;
        }
        self.total_matches += answer.matches.len();
    }
}

/// Most queries that may be in flight at once while answers are being put back in order.
pub fn reorder_window(options: &OverlapOptions) -> usize {
    options.channel_capacity + options.threads
}

/// Tells the producer to stop when the worker holding it unwinds.
struct PanicSignal(Sender<()>);

impl Drop for PanicSignal {
    fn drop(&mut self) {
        if thread::panicking() {
            let _ = self.0.try_send(());
        }
    }
}

/// Holds answers that arrived ahead of their turn.
struct ReorderBuffer<A> {
    enabled: bool,
    next_seq: u64,
    pending: BTreeMap<u64, A>,
    ready: VecDeque<A>,
}

impl<'a, Q, T> ReorderBuffer<QueryAnswer<'a, Q, T>> {
    fn new(enabled: bool) -> Self {
        ReorderBuffer {
            enabled,
            next_seq: 0,
            pending: BTreeMap::new(),
            ready: VecDeque::new(),
        }
    }

    fn push(&mut self, answer: QueryAnswer<'a, Q, T>) {
        if !self.enabled {
            self.ready.push_back(answer);
            return;
        }
        self.pending.insert(answer.seq, answer);
        while let Some(next) = self.pending.remove(&self.next_seq) {
            self.ready.push_back(next);
            self.next_seq += 1;
        }
    }

    fn pop_ready(&mut self) -> Option<QueryAnswer<'a, Q, T>> {
        self.ready.pop_front()
    }

    /// Everything still held, in sequence order.
    fn drain(self) -> impl Iterator<Item = QueryAnswer<'a, Q, T>> {
        self.ready.into_iter().chain(self.pending.into_values())
    }
}

///
/// Answer every query in `queries` against `tree`, handing each [`QueryAnswer`] to `sink`.
///
/// With `preserve_order` set, answers reach the sink in input order; otherwise in whatever
/// order the workers finish them. A decode error from the query stream ends the stream; the
/// queries read before it are still answered and the error is returned once the pipeline has
/// drained. If `sink` fails, the pipeline shuts down early and that error wins.
///
/// # Arguments
///
/// - tree: the select set, built before any query runs
/// - queries: the query stream
/// - options: relation, thread count, ordering and channel capacity
/// - sink: consumer of answers, called on the calling thread only
///
pub fn run_pipeline<'a, T, Q, E, I, F>(
    tree: &'a OverlapTree<T>,
    queries: I,
    options: &OverlapOptions,
    mut sink: F,
) -> Result<PipelineStats, OverlapError>
where
    T: Interval + Sync,
    Q: Interval + Send,
    E: Into<Box<dyn Error + Send + Sync>> + Send,
    I: IntoIterator<Item = Result<Q, E>>,
    I::IntoIter: Send,
    F: FnMut(QueryAnswer<'a, Q, T>) -> io::Result<()>,
{
    options.validate()?;

    let relation = options.relation;
    info!(
        "Querying {} intervals on {} chromosomes with {} thread(s), relationship '{}'",
        tree.len(),
        tree.chrom_count(),
        options.threads,
        relation
    );

    let (query_tx, query_rx) = bounded::<(u64, Q)>(options.channel_capacity);
    let (answer_tx, answer_rx) = bounded::<QueryAnswer<'a, Q, T>>(options.channel_capacity);
    let queries = queries.into_iter();

    let (token_tx, token_rx) = if options.preserve_order {
        let window = reorder_window(options);
        let (tx, rx) = bounded::<()>(window);
        for _ in 0..window {
            // the channel holds exactly `window` tokens
            let _ = tx.try_send(());
        }
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    let (panic_tx, panic_rx) = bounded::<()>(options.threads);

    thread::scope(|s| -> Result<PipelineStats, OverlapError> {
        let producer = s.spawn(move || -> Result<u64, E> {
            let tokens: Option<Receiver<()>> = token_rx;
            let mut seq = 0u64;
            for item in queries {
                let query = item?;
                if let Some(tokens) = &tokens {
                    let proceed = select! {
                        recv(tokens) -> token => token.is_ok(),
                        // a worker died, so the answer being waited on may never come
                        recv(panic_rx) -> _ => false,
                    };
                    if !proceed {
                        break;
                    }
                }
                if query_tx.send((seq, query)).is_err() {
                    // every worker is gone; the consumer gave up
                    break;
                }
                seq += 1;
            }
            Ok(seq)
        });

        let workers: Vec<_> = (0..options.threads)
            .map(|_| {
                let query_rx = query_rx.clone();
                let answer_tx = answer_tx.clone();
                let signal = PanicSignal(panic_tx.clone());
                s.spawn(move || {
                    let _signal = signal;
                    for (seq, query) in query_rx.iter() {
                        let matches = tree.query(&query, relation);
                        if answer_tx.send(QueryAnswer { seq, query, matches }).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();
        drop(query_rx);
        drop(panic_tx);

        let supervisor = s.spawn(move || {
            let mut panicked = false;
            for worker in workers {
                panicked |= worker.join().is_err();
            }
            drop(answer_tx);
            panicked
        });

        let mut stats = PipelineStats::default();
        let mut reorder = ReorderBuffer::new(options.preserve_order);
        let mut sink_result: io::Result<()> = Ok(());

        'drain: for answer in answer_rx.iter() {
            stats.record(&answer);
            reorder.push(answer);
            while let Some(ready) = reorder.pop_ready() {
                if let Err(e) = sink(ready) {
                    sink_result = Err(e);
                    break 'drain;
                }
                if let Some(tokens) = &token_tx {
                    let _ = tokens.try_send(());
                }
            }
        }
        if sink_result.is_ok() {
            for rest in reorder.drain() {
                if let Err(e) = sink(rest) {
                    sink_result = Err(e);
                    break;
                }
            }
        }
        // unblocks any worker still waiting to send, and a producer waiting for a token
        drop(answer_rx);
        drop(token_tx);

        let produced = producer.join();
        let supervised = supervisor.join();

        sink_result?;
        match produced {
            Ok(Ok(sent)) => debug!("Producer sent {} queries", sent),
            Ok(Err(e)) => return Err(OverlapError::QueryStream(e.into())),
            Err(_) => return Err(OverlapError::ThreadPanicked("producer")),
        }
        match supervised {
            Ok(false) => {}
            Ok(true) => return Err(OverlapError::ThreadPanicked("worker")),
            Err(_) => return Err(OverlapError::ThreadPanicked("supervisor")),
        }

        info!(
            "Answered {} queries: {} with matches, {} matches in total",
            stats.queries, stats.queries_with_matches, stats.total_matches
        );
        Ok(stats)
    })
}

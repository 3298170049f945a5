//! scatter / gather of work items over a fixed pool of workers.
//!
//! Worker 0 is the coordinator: it partitions the items round-robin (item i goes to worker i % nb_workers),
//! sends each worker its piece on a dedicated channel, processes its own piece, waits for all workers
//! (barrier) and then gathers results through a channel. Results are concatenated in worker order.
//! Workers share nothing but the read-only task and an abort flag raised when one of them fails.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{bounded, unbounded};
use crossbeam_utils::sync::WaitGroup;

use crate::errors::{HybridError, Result};

/// rank of the coordinating worker
pub const COORDINATOR_RANK: usize = 0;

/// item i goes to piece i % nb_workers, order inside a piece is the original order
pub fn partition_round_robin<T>(items: Vec<T>, nb_workers: usize) -> Vec<Vec<T>> {
    let nb_workers = nb_workers.max(1);
    let mut pieces: Vec<Vec<T>> = (0..nb_workers).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        pieces[i % nb_workers].push(item);
    }
    pieces
} // end of partition_round_robin

// sequential processing of a piece, stops at first error or if another worker failed
fn run_worker<T, R, F>(rank: usize, piece: &[T], task: &F, abort: &AtomicBool) -> Result<Vec<R>>
where
    F: Fn(usize, &T) -> Result<R>,
{
    log::debug!("worker {} got {} items", rank, piece.len());
    let mut results = Vec::<R>::with_capacity(piece.len());
    for item in piece {
        if abort.load(Ordering::Acquire) {
            log::info!("worker {} stops, another worker failed", rank);
            break;
        }
        match task(rank, item) {
            Ok(res) => results.push(res),
            Err(e) => {
                log::error!("worker {} failed : {}", rank, e);
                abort.store(true, Ordering::Release);
                return Err(e);
            }
        }
    }
    log::debug!("worker {} done, nb results : {}", rank, results.len());
    Ok(results)
} // end of run_worker

/// runs task on every item with nb_workers workers and returns the results grouped by worker:
/// results of worker 0 in assignment order, then worker 1 and so on.
/// The first error (in worker order) is returned if any item failed.
pub fn scatter_gather<T, R, F>(items: Vec<T>, nb_workers: usize, task: F) -> Result<Vec<R>>
where
    T: Send,
    R: Send,
    F: Fn(usize, &T) -> Result<R> + Sync,
{
    let nb_workers = nb_workers.max(1);
    let nb_items = items.len();
    log::info!("scatter_gather nb items : {}, nb workers : {}", nb_items, nb_workers);
    //
    let mut pieces = partition_round_robin(items, nb_workers);
    let abort = AtomicBool::new(false);
    let (gather_sender, gather_receiver) = unbounded::<(usize, Result<Vec<R>>)>();
    //
    let scope_res = crossbeam_utils::thread::scope(|scope| {
        let barrier = WaitGroup::new();
        let mut scatter_senders = Vec::with_capacity(nb_workers - 1);
        for rank in 1..nb_workers {
            let (piece_sender, piece_receiver) = bounded::<Vec<T>>(1);
            scatter_senders.push(piece_sender);
            let gather_sender = gather_sender.clone();
            let worker_barrier = barrier.clone();
            let task = &task;
            let abort = &abort;
            scope.spawn(move |_| {
                let piece = piece_receiver.recv().unwrap_or_default();
                let res = run_worker(rank, &piece, task, abort);
                let _ = gather_sender.send((rank, res));
                // leaving the barrier
                drop(worker_barrier);
            });
        }
        // scatter
        let own_piece = std::mem::take(&mut pieces[COORDINATOR_RANK]);
        for (piece_sender, piece) in scatter_senders.iter().zip(pieces.drain(1..)) {
            if piece_sender.send(piece).is_err() {
                log::error!("could not send work to a worker");
            }
        }
        drop(scatter_senders);
        // coordinator does its share
        let res = run_worker(COORDINATOR_RANK, &own_piece, &task, &abort);
        let _ = gather_sender.send((COORDINATOR_RANK, res));
        //
        barrier.wait();
        log::debug!("all workers reached barrier");
    });
    if scope_res.is_err() {
        log::error!("a worker panicked");
        return Err(HybridError::Worker(String::from("a worker panicked")));
    }
    drop(gather_sender);
    // gather
    let mut gathered: Vec<(usize, Result<Vec<R>>)> = gather_receiver.try_iter().collect();
    if gathered.len() != nb_workers {
        return Err(HybridError::Worker(format!(
            "gathered {} results for {} workers",
            gathered.len(),
            nb_workers
        )));
    }
    gathered.sort_by_key(|(rank, _)| *rank);
    let mut all_results = Vec::<R>::with_capacity(nb_items);
    for (_, res) in gathered {
        all_results.append(&mut res?);
    }
    Ok(all_results)
} // end of scatter_gather

//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_robin_assignment() {
        let pieces = partition_round_robin((0..8).collect::<Vec<usize>>(), 3);
        assert_eq!(pieces, vec![vec![0, 3, 6], vec![1, 4, 7], vec![2, 5]]);
        for (rank, piece) in pieces.iter().enumerate() {
            for item in piece {
                assert_eq!(item % 3, rank);
            }
        }
    }

    #[test]
    fn more_workers_than_items() {
        let pieces = partition_round_robin(vec!['a', 'b'], 4);
        assert_eq!(pieces, vec![vec!['a'], vec!['b'], vec![], vec![]]);
        let res = scatter_gather(vec![1, 2], 4, |_, x: &i32| Ok(x * 2)).unwrap();
        assert_eq!(res, vec![2, 4]);
    }

    #[test]
    fn results_are_grouped_by_worker() {
        let items: Vec<usize> = (0..8).collect();
        let res = scatter_gather(items, 3, |rank, item: &usize| Ok((rank, *item))).unwrap();
        assert_eq!(
            res,
            vec![(0, 0), (0, 3), (0, 6), (1, 1), (1, 4), (1, 7), (2, 2), (2, 5)]
        );
    }

    #[test]
    fn every_item_processed_once() {
        let items: Vec<usize> = (0..101).collect();
        let mut res = scatter_gather(items, 7, |rank, item: &usize| {
            assert_eq!(item % 7, rank);
            Ok(*item)
        })
        .unwrap();
        res.sort();
        assert_eq!(res, (0..101).collect::<Vec<usize>>());
    }

    #[test]
    fn zero_worker_runs_on_coordinator() {
        let res = scatter_gather(vec![5, 6], 0, |rank, x: &i32| {
            assert_eq!(rank, COORDINATOR_RANK);
            Ok(*x)
        })
        .unwrap();
        assert_eq!(res, vec![5, 6]);
    }

    #[test]
    fn failure_is_fatal() {
        let items: Vec<usize> = (0..20).collect();
        let res = scatter_gather(items, 4, |_, item: &usize| {
            if *item == 9 {
                Err(HybridError::Worker(String::from("item 9")))
            } else {
                Ok(*item)
            }
        });
        match res {
            Err(HybridError::Worker(msg)) => assert_eq!(msg, "item 9"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn empty_input() {
        let res = scatter_gather(Vec::<u8>::new(), 3, |_, x: &u8| Ok(*x)).unwrap();
        assert!(res.is_empty());
    }
} // end of mod tests

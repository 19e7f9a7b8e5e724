use futures::{executor::block_on, future::join, stream, StreamExt};
use futures_replay::prelude::*;

fn main() {
    let subject = ReplaySubject::<i32, &str>::new(2);

    subject.send(1);
    subject.send(2);
    subject.send(3);

    let early = subject.observe();

    subject.send(4);
    subject.send_completion(Terminal::Completed);

    let late = subject.observe();

    block_on(async {
        let (a, b) = join(early.collect::<Vec<_>>(), late.collect::<Vec<_>>()).await;

        println!("{:?}", a);
        println!("{:?}", b);
    });

    let shared = stream::iter(1..=5).share_replay(3);
    let replayed = shared.clone();

    block_on(async {
        let all = shared.collect::<Vec<_>>().await;
        let tail = replayed.collect::<Vec<_>>().await;

        println!("{:?}", all);
        println!("{:?}", tail);
    });
}

// Example: scroll-to-index requests and alignment.
use virtual_scroll::{Align, VirtualScroll, VirtualScrollOptions};

fn main() {
    let mut list = VirtualScroll::new(
        VirtualScrollOptions::fixed(1_000, 20)
            .with_scroll_to_index(Some(250))
            .with_on_scroll(Some(|n| println!("scroll: {n:?}"))),
    );
    // The initial request lands on the first render pass.
    list.update(1_000, 500, 5);

    for align in [Align::Start, Align::Center, Align::End, Align::Auto] {
        list.scroll_to_index(500, align);
        // A late viewport event is ignored while the request is pending.
        let accepted = list.on_scroll(0, 500, list.total_size());
        let range = list.update(1_000, 500, 5);
        println!("{align:?}: accepted_raw={accepted} off={} range={range:?}", list.scroll_offset());
    }

    // Out-of-range targets are ignored.
    println!("scroll_to_index(5_000) = {}", list.scroll_to_index(5_000, Align::Start));
}

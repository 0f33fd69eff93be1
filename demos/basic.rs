// Example: a fixed-row list driven by scroll events.
use virtual_scroll::{Rendered, VirtualScroll, VirtualScrollOptions};

fn main() {
    let mut list = VirtualScroll::new(
        VirtualScrollOptions::fixed(1_000, 20)
            .with_overscan(5)
            .with_on_rows_rendered(Some(|r| println!("rows rendered: {r:?}"))),
    );

    list.update(1_000, 500, 5);
    for offset in [120, 200, 205, 219, 4_000] {
        list.on_scroll(offset, 500, list.total_size());
        list.update(1_000, 500, 5);
    }

    let out = list.render(
        |row| format!("row {} @ {}..{}", row.index, row.start, row.start + row.size as u64),
        || "no rows".to_owned(),
    );
    if let Rendered::Rows(rows) = out {
        println!("first={:?} last={:?}", rows.first(), rows.last());
    }

    // Shrinking the list pulls the offset back and reports the new range.
    list.update(10, 500, 5);
    println!("after shrink: offset={}", list.scroll_offset());

    list.update(0, 500, 5);
    println!("{:?}", list.render(|row| row.index.to_string(), || "no rows".to_owned()));
}

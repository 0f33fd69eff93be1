// Example: estimated sizes refined by measurements.
use virtual_scroll::{VirtualScroll, VirtualScrollOptions};

fn main() {
    let mut list = VirtualScroll::new(VirtualScrollOptions::estimated(100, |_| 30));
    list.update(100, 100, 2);
    list.set_scroll_offset(200);
    list.update(100, 100, 2);

    println!(
        "before: off={} total={} range={:?}",
        list.scroll_offset(),
        list.total_size(),
        list.rendered_range()
    );

    // Rows above the viewport grew; `resize_item` shifts the offset so visible rows stay put.
    let applied = list.resize_item(0, 80);
    println!(
        "resize_item(0): applied_delta={applied} off={} total={}",
        list.scroll_offset(),
        list.total_size()
    );

    // Plain measurements of rendered rows.
    let rendered: Vec<usize> = list.items_to_render().iter().map(|it| it.index).collect();
    list.measure_many(rendered.iter().map(|&i| (i, 20 + (i as u32 % 3) * 10)));
    println!("range={:?}", list.update(100, 100, 2));

    // Structure changed from row 5 on: drop those measurements.
    list.recompute_row_sizes(5);
    println!("after recompute: total={}", list.total_size());

    list.measure_all_rows();
    println!("after measure_all_rows: total={}", list.total_size());
}

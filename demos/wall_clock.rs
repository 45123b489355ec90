//! Example: the default variant with wall-clock timestamps and UUID peers.

use lww_dict::prelude::*;

fn main() {
    let mut laptop: WallClockDict<String, String> = WallClockDict::with_wall_clock();
    let mut phone: WallClockDict<String, String> = WallClockDict::with_wall_clock();

    println!("laptop peer: {}", laptop.peer_id());
    println!("phone peer:  {}", phone.peer_id());

    laptop.set("theme".into(), "dark".into());
    phone.set("theme".into(), "light".into());
    phone.set("font".into(), "mono".into());

    laptop.merge(&phone);
    phone.merge(&laptop);

    println!("\nlaptop: {laptop}");
    println!("phone:  {phone}");
    println!("converged: {}", laptop.content_eq(&phone));
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// クラスIDごとの注釈色（RGB）
///
/// シード固定の乱数で生成するため、実行をまたいで同じクラスは同じ色になる。
/// 描画そのものは表示側の責務で、このクレートは色表だけを提供する
pub fn class_colors(num_classes: usize) -> Vec<[u8; 3]> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..num_classes)
        .map(|_| [rng.gen::<u8>(), rng.gen::<u8>(), rng.gen::<u8>()])
        .collect()
}

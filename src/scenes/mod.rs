//! Scenes the run moves through: wave, shop, game over

pub mod gameover;
pub mod shop;
pub mod wave;

pub use gameover::GameOverScene;
pub use shop::ShopScene;
pub use wave::WaveScene;

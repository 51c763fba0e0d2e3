//! 块游标
//!
//! 在文档块序列上单向前进的游标。需要多行前瞻时先克隆出
//! 探针游标,前瞻成功后把探针赋回主游标,失败则丢弃探针,
//! 这样"看过但没认出来"的行不会被消费掉。

use crate::models::block::DocBlock;

#[derive(Debug, Clone)]
pub struct BlockCursor<'a> {
    blocks: &'a [DocBlock],
    pos: usize,
}

impl<'a> BlockCursor<'a> {
    pub fn new(blocks: &'a [DocBlock]) -> Self {
        Self { blocks, pos: 0 }
    }

    /// 当前块,不前进
    pub fn peek(&self) -> Option<&'a DocBlock> {
        self.blocks.get(self.pos)
    }

    /// 取当前块并前进一格
    pub fn advance(&mut self) -> Option<&'a DocBlock> {
        let block = self.blocks.get(self.pos);
        if block.is_some() {
            self.pos += 1;
        }
        block
    }

    /// 跳过连续的空白块
    pub fn skip_blank(&mut self) {
        while self.peek().map_or(false, |b| b.is_blank()) {
            self.pos += 1;
        }
    }
}

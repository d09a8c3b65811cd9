use crate::tensor::Tensor;
use std::fmt;

impl fmt::Display for Tensor {
    /// 按行打印；行数或列数超过6时只显示首尾各3个
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "形状: {:?}", self.shape())?;
        if self.dimension() != 2 {
            return writeln!(f, "{:?}", self.data_as_slice());
        }
        let (rows, cols) = (self.shape()[0], self.shape()[1]);
        let data = self.data_as_slice();
        let visible = |n: usize| -> Vec<Option<usize>> {
            if n > 6 {
                let mut idx = (0..3).map(Some).collect::<Vec<_>>();
                idx.push(None);
                idx.extend((n - 3..n).map(Some));
                idx
            } else {
                (0..n).map(Some).collect()
            }
        };
        for row in visible(rows) {
            match row {
                Some(i) => {
                    for col in visible(cols) {
                        match col {
                            Some(j) => write!(f, "{:8.4} ", data[i * cols + j])?,
                            None => write!(f, "   ..  ")?,
                        }
                    }
                    writeln!(f)?;
                }
                None => writeln!(f, "   ..")?,
            }
        }
        Ok(())
    }
}
